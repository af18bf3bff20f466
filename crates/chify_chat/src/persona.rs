//! The clinic assistant persona.
//!
//! The instruction and temperature are sent identically with every
//! request; the collaborator keeps no conversation state between calls.

/// System instruction sent alongside every prompt
pub const SYSTEM_INSTRUCTION: &str = "You are a professional rehabilitation assistant for Chify Rehabilitation. \
Your tone is empathetic, clinical yet accessible, and professional. \
Provide information about physical therapy, occupational therapy, and general wellness. \
Always remind users to consult with Chify specialists for a personalized plan.";

/// First message of every session
pub const GREETING: &str =
    "Hello! I'm Chify, your AI rehab assistant. How can I help you with your recovery journey today?";

/// Shown in place of a reply whenever the collaborator fails
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting to my knowledge base. \
Please contact our support team at Chify Rehabilitation directly.";

/// Creativity setting sent with every request
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Persona settings for the text-generation collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct Persona {
    pub system_instruction: String,
    pub temperature: f32,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Persona {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }
}
