use std::sync::Arc;

use actix_web::{dev::ServiceRequest, web, HttpMessage};

use crate::connectors::{BaasConnector, ConnectorError};
use crate::db;
use crate::middleware::authentication::{get_header, AuthFailure};

fn try_extract_token(authentication: &str) -> Option<&str> {
    authentication
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the bearer token to a user through the BaaS identity service
/// plus the profile and role lookup.
#[tracing::instrument(name = "Authenticate with bearer token", skip_all)]
pub async fn try_bearer(req: &mut ServiceRequest) {
    let authentication = match get_header::<String>(req, "authorization") {
        Ok(Some(value)) => value,
        Ok(None) => return,
        Err(msg) => {
            tracing::debug!("{}", msg);
            req.extensions_mut()
                .insert(AuthFailure("Token não fornecido".to_string()));
            return;
        }
    };

    let token = match try_extract_token(&authentication) {
        Some(token) => token.to_string(),
        None => {
            req.extensions_mut()
                .insert(AuthFailure("Token não fornecido".to_string()));
            return;
        }
    };

    let baas = match req.app_data::<web::Data<Arc<dyn BaasConnector>>>() {
        Some(baas) => baas.get_ref().clone(),
        None => {
            tracing::error!("BaaS connector is not registered");
            req.extensions_mut()
                .insert(AuthFailure("Erro de autenticação".to_string()));
            return;
        }
    };

    let identity = match baas.get_auth_user(&token).await {
        Ok(identity) => identity,
        Err(ConnectorError::Unauthorized(_)) | Err(ConnectorError::NotFound(_)) => {
            req.extensions_mut()
                .insert(AuthFailure("Token inválido".to_string()));
            return;
        }
        Err(err) => {
            tracing::error!("Token introspection failed: {}", err);
            req.extensions_mut()
                .insert(AuthFailure("Erro de autenticação".to_string()));
            return;
        }
    };

    match db::user::fetch_account(baas.as_ref(), &identity.id).await {
        Ok(Some(user)) => {
            tracing::debug!(user_id = %user.id, role = user.role.as_str(), "authenticated");
            req.extensions_mut().insert(Arc::new(user));
        }
        Ok(None) => {
            req.extensions_mut()
                .insert(AuthFailure("Usuário não encontrado".to_string()));
        }
        Err(err) => {
            tracing::error!("Failed to load user {}: {}", identity.id, err);
            req.extensions_mut()
                .insert(AuthFailure("Erro de autenticação".to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(try_extract_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(try_extract_token("Bearer "), None);
        assert_eq!(try_extract_token("Basic dXNlcjpwYXNz"), None);
    }
}
