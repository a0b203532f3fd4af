pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;

pub fn success(msg: Message) -> String {
    format!("✅ {}", msg)
}

pub fn error(msg: Message) -> String {
    format!("❌ {}", msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_messages() {
        assert_eq!(success(Message::TaskCreated), "✅ Task created successfully!");
        assert_eq!(error(Message::TaskNotFoundWithId(4)), "❌ Task ID 4 does not exist.");
    }

    #[test]
    fn test_lockout_message_carries_seconds() {
        let text = Message::TooManyAttempts(10).to_string();
        assert!(text.contains("10 seconds"));
    }
}
