use serde::{Deserialize, Serialize};

use orderflow_core::{ClientId, DomainError, DomainResult, Entity};

/// Entity: Client.
///
/// Immutable once constructed; the caller builds one before placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    name: String,
    email: String,
}

impl Client {
    /// Construct a client record. All fields are required and non-empty.
    pub fn new(
        id: impl Into<ClientId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> DomainResult<Self> {
        let id = id.into();
        let name = name.into();
        let email = email.into();

        if id.is_empty() {
            return Err(DomainError::validation("client id cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("client name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("client email cannot be empty"));
        }

        Ok(Self { id, name, email })
    }

    pub fn id_typed(&self) -> &ClientId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_with_all_fields() {
        let client = Client::new("CLI-001", "Ada Lovelace", "ada@example.com").unwrap();
        assert_eq!(client.id().as_str(), "CLI-001");
        assert_eq!(client.name(), "Ada Lovelace");
        assert_eq!(client.email(), "ada@example.com");
    }

    #[test]
    fn rejects_empty_id() {
        let err = Client::new("", "Ada", "ada@example.com").unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("client id") => {}
            _ => panic!("Expected validation error for empty id"),
        }
    }

    #[test]
    fn rejects_blank_name() {
        let err = Client::new("CLI-001", "   ", "ada@example.com").unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("client name") => {}
            _ => panic!("Expected validation error for blank name"),
        }
    }

    #[test]
    fn rejects_empty_email() {
        let err = Client::new("CLI-001", "Ada", "").unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("client email") => {}
            _ => panic!("Expected validation error for empty email"),
        }
    }
}
