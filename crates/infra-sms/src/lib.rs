// Twilio SMS Adapter

mod twilio;

pub use twilio::{DisabledSmsSender, TwilioConfig, TwilioSmsSender};
