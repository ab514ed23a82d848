use super::Message;
use super::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::Assistant, "Hi there!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.role.to_string(), "assistant");
    assert_eq!(msg.content, "Hi there!".to_string());
}

#[test]
fn it_executes_user() {
    let msg = Message::user("Hello");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.role.to_string(), "user");
}

#[test]
fn it_keeps_content_untouched() {
    let msg = Message::user("\tindented\n\nand multi-line ");
    assert_eq!(msg.content, "\tindented\n\nand multi-line ");
}

#[test]
fn it_formats_transcript_entry() {
    let msg = Message::assistant("Hi Ada");
    insta::assert_snapshot!(msg.as_transcript_entry(), @"assistant: Hi Ada");
}

#[test]
fn it_serializes_role_lowercase() {
    let json = serde_json::to_string(&Message::user("Hello")).unwrap();
    assert_eq!(json, r#"{"role":"user","content":"Hello"}"#);
}

#[test]
fn it_deserializes_role_lowercase() {
    let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":"Hi"}"#).unwrap();
    assert_eq!(msg, Message::assistant("Hi"));
}
