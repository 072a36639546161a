use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Authorization role resolved from the `user_roles` table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "cliente",
            Role::Admin => "admin",
        }
    }

    /// Name reported to the frontend at sign-in
    pub fn label(&self) -> &'static str {
        match self {
            Role::Customer => "cliente",
            Role::Admin => "administrador",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Unknown role names fall back to the least privileged role
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" | "administrador" => Role::Admin,
            _ => Role::Customer,
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Role::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "ativa")]
    Active,
    #[serde(rename = "inativa")]
    Inactive,
    #[serde(rename = "suspensa")]
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ativa",
            UserStatus::Inactive => "inativa",
            UserStatus::Suspended => "suspensa",
        }
    }
}

/// Row of the `usuarios` table joined with its role.
///
/// The role is not a column of `usuarios`, so it is never written back with the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nome_completo: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default, skip_serializing)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn first_name(&self) -> &str {
        self.nome_completo.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the first name, or "Cliente" for single-word names
    pub fn last_name(&self) -> String {
        let rest = self
            .nome_completo
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" ");

        if rest.is_empty() {
            "Cliente".to_string()
        } else {
            rest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            nome_completo: name.to_string(),
            telefone: None,
            status: UserStatus::Active,
            role: Role::Customer,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn role_accepts_both_admin_spellings() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("administrador"), Role::Admin);
        assert_eq!(Role::parse("cliente"), Role::Customer);
        assert_eq!(Role::parse("root"), Role::Customer);
    }

    #[test]
    fn role_null_is_customer() {
        let role: Role = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(role, Role::Customer);
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), "admin");
    }

    #[test]
    fn payer_names_split() {
        let u = user("Ana Maria Souza");
        assert_eq!(u.first_name(), "Ana");
        assert_eq!(u.last_name(), "Maria Souza");

        let u = user("Ana");
        assert_eq!(u.last_name(), "Cliente");
    }

    #[test]
    fn row_without_role_deserializes() {
        let row = serde_json::json!({
            "id": "6f2b1c1e-5c1a-4a57-9a37-3a9d3c1f7c10",
            "email": "ana@example.com",
            "nome_completo": "Ana",
            "status": "suspensa"
        });
        let u: User = serde_json::from_value(row).unwrap();
        assert_eq!(u.status, UserStatus::Suspended);
        assert_eq!(u.role, Role::Customer);
    }
}
