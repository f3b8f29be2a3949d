use actix_web::{post, put, web, HttpResponse};
use validator::Validate;

use crate::error::AppError;
use crate::models::dto::{EmailDto, NewPasswordDto};
use crate::services::auth_service::AuthService;

/// POST /auth/recover-token - Demander un lien de récupération (PUBLIC)
/// Toujours 204 : ni le token ni l'existence du compte ne sont révélés.
/// Recherche du compte + envoi de l'email dans une tâche séparée, la réponse
/// part avant, avec le même délai pour un email inscrit ou non.
#[post("/recover-token")]
pub async fn create_recover_token(
    body: web::Json<EmailDto>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let email = body.into_inner().email;
    let auth = auth.into_inner();
    actix_web::rt::spawn(async move {
        if let Err(e) = auth.create_recover_token(&email).await {
            tracing::error!(error = %e, "recover token request failed");
        }
    });

    Ok(HttpResponse::NoContent().finish())
}

/// PUT /auth/new-password - Définir un nouveau mot de passe avec le token (PUBLIC)
#[put("/new-password")]
pub async fn save_new_password(
    body: web::Json<NewPasswordDto>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    auth.save_new_password(&body.token, &body.new_password).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(create_recover_token)
            .service(save_new_password)
    );
}
