use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::auth::tokens::TokenPair;

// Every flow that sets or clears the transport session goes through these names.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

const COOKIE_PATH: &str = "/";

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .path(COOKIE_PATH)
        .build()
}

pub fn set_session(jar: CookieJar, tokens: &TokenPair, secure: bool) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
        secure,
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
        secure,
    ))
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(name, String::new(), secure);
    cookie.make_removal();
    cookie
}

/// Always emits expiring cookies, whether or not the request carried them.
pub fn clear_session(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE, secure))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE, secure))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "a.b.c".into(),
            refresh_token: "d.e.f".into(),
        }
    }

    #[test]
    fn session_cookies_are_http_only() {
        let jar = set_session(CookieJar::new(), &pair(), true);
        let access = jar.get(ACCESS_TOKEN_COOKIE).expect("access cookie");
        assert_eq!(access.value(), "a.b.c");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().value(), "d.e.f");
    }

    #[test]
    fn clearing_expires_both_names_that_were_set() {
        let jar = set_session(CookieJar::new(), &pair(), false);
        let jar = clear_session(jar, false);
        for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
            let c = jar.get(name).expect("removal cookie");
            assert_eq!(c.value(), "");
            assert!(c.max_age().is_some_and(|age| age.is_zero()));
            assert_eq!(c.path(), Some(COOKIE_PATH));
        }
    }
}
