// Inbound WhatsApp messages (Twilio webhook) and the replies sent back.

pub mod handlers;
pub mod replies;
