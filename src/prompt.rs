//! Prompt Builder for SQL generation
//!
//! Composes the two-message conversation sent to the completion service:
//! a system message grounding the model in the schema plus the operation's
//! directive, and a user message carrying the caller's text unmodified.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};
use crate::operation::OperationSpec;
use crate::schema::SchemaDocument;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

/// One role-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Builder for the schema-grounded SQL generation prompt
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    schema: SchemaDocument,
}

impl PromptBuilder {
    pub fn new(schema: SchemaDocument) -> Self {
        Self { schema }
    }

    /// Grounding preamble shared by every operation
    pub fn schema_prompt(&self) -> String {
        format!(
            "You have this Prisma schema:\n\n{}\n\n\
             Translate the user's request into a valid PostgreSQL query \
             using ONLY those tables/columns. Return only the raw SQL.",
            self.schema.as_str()
        )
    }

    /// Build `[system, user]` for one operation.
    ///
    /// Fails for operations without a directive (`raw`), which never reach
    /// the completion service.
    pub fn build(
        &self,
        operation: &OperationSpec,
        user_text: &str,
    ) -> QueryResult<Vec<PromptMessage>> {
        let directive = operation.directive.ok_or_else(|| {
            QueryError::Internal(format!(
                "operation '{}' has no prompt directive",
                operation.kind
            ))
        })?;

        Ok(vec![
            PromptMessage::system(format!(
                "{}\n\nSpecifically, {}",
                self.schema_prompt(),
                directive
            )),
            PromptMessage::user(user_text),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationKind;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(SchemaDocument::from_text("model Restaurant { id Int @id city String }").unwrap())
    }

    #[test]
    fn test_build_produces_system_then_user() {
        let messages = builder()
            .build(OperationKind::Select.spec(), "show me all restaurants in Chicago")
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "show me all restaurants in Chicago");
    }

    #[test]
    fn test_system_message_contains_schema_and_directive() {
        let messages = builder()
            .build(OperationKind::Update.spec(), "rename restaurant 3")
            .unwrap();
        let system = &messages[0].content;

        assert!(system.starts_with("You have this Prisma schema:\n\nmodel Restaurant"));
        assert!(system.contains("using ONLY those tables/columns"));
        assert!(system.contains("Return only the raw SQL."));
        assert!(system.ends_with("\n\nSpecifically, generate an UPDATE."));
    }

    #[test]
    fn test_user_text_is_not_modified() {
        let text = "  delete order #7;  \n";
        let messages = builder().build(OperationKind::Delete.spec(), text).unwrap();
        assert_eq!(messages[1].content, text);
    }

    #[test]
    fn test_build_is_deterministic() {
        let b = builder();
        let first = b.build(OperationKind::Create.spec(), "add a user").unwrap();
        let second = b.build(OperationKind::Create.spec(), "add a user").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_raw_cannot_be_prompted() {
        let err = builder()
            .build(OperationKind::Raw.spec(), "SELECT 1")
            .unwrap_err();
        assert_eq!(err.kind(), "internal");
    }
}
