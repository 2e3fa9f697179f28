use mongodb::bson::oid::ObjectId;

use crate::{
    dto::account::UpdateAccountRequest,
    errors::AppError,
    media::Upload,
    models::user::{ProfileImage, UserPublic},
    state::AppState,
};

pub async fn current_user(state: &AppState, user_id: &ObjectId) -> Result<UserPublic, AppError> {
    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;
    Ok(user.into())
}

pub async fn update_details(
    state: &AppState,
    user_id: &ObjectId,
    req: UpdateAccountRequest,
) -> Result<UserPublic, AppError> {
    let full_name = req.full_name.trim().to_string();
    let email = req.email.trim().to_string();
    if full_name.is_empty() || email.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("email is invalid".into()));
    }

    let user = state.store.update_details(user_id, full_name, email).await?;
    tracing::info!(user_id = %user_id, "account details updated");
    Ok(user.into())
}

pub async fn update_image(
    state: &AppState,
    user_id: &ObjectId,
    image: ProfileImage,
    file: Option<Upload>,
) -> Result<UserPublic, AppError> {
    let file = file.ok_or_else(|| {
        AppError::Validation(match image {
            ProfileImage::Avatar => "Avatar file is required".into(),
            ProfileImage::Cover => "Cover image file is required".into(),
        })
    })?;

    let asset = state.media.upload(file).await?;
    let user = state.store.set_profile_image(user_id, image, asset.url).await?;
    tracing::info!(user_id = %user_id, field = image.field(), "profile image updated");
    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::*;

    fn details(full_name: &str, email: &str) -> UpdateAccountRequest {
        UpdateAccountRequest {
            full_name: full_name.into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn current_user_loads_by_session_id() {
        let (state, store) = test_state();
        let user = seed_user(&store, TEST_USERNAME, TEST_EMAIL, TEST_PASSWORD).await;
        assert_eq!(current_user(&state, &user.id).await.unwrap().email, TEST_EMAIL);

        let err = current_user(&state, &ObjectId::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_details_checks_input_and_email_ownership() {
        let (state, store) = test_state();
        let user = seed_user(&store, TEST_USERNAME, TEST_EMAIL, TEST_PASSWORD).await;
        seed_user(&store, "u2", "u2@example.com", TEST_PASSWORD).await;

        let updated = update_details(&state, &user.id, details(" New Name ", "new@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.full_name, "New Name");
        assert_eq!(updated.email, "new@example.com");

        let err = update_details(&state, &user.id, details("x", "u2@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = update_details(&state, &user.id, details("", "a@b.c")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn image_updates_store_uploaded_url() {
        let (state, store) = test_state();
        let user = seed_user(&store, TEST_USERNAME, TEST_EMAIL, TEST_PASSWORD).await;

        let updated = update_image(&state, &user.id, ProfileImage::Cover, Some(upload("cover.jpg")))
            .await
            .unwrap();
        assert_eq!(updated.cover_image, "https://media.test/cover.jpg");
        assert_eq!(updated.avatar, "https://media.test/seed.png");

        let err = update_image(&state, &user.id, ProfileImage::Avatar, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
