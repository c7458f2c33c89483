pub mod message_xp;
