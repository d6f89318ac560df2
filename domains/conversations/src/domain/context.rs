//! Builds what the model sees: persona, personalization and the history window

use pha_llm::LlmMessage;
use uuid::Uuid;

use crate::domain::entities::{ChatMessage, ChatProfile, MessageRole};

/// Assistant persona sent as the system instruction
pub const DEFAULT_PERSONA: &str = "\
Kamu adalah Personal Health Assistant (PHA), asisten AI yang suportif dan empatik untuk kesehatan mental ringan.

Aturan:
- Kamu bukan dokter dan tidak boleh memberikan diagnosis medis.
- Tanggapi dengan empati dan dukungan.
- Gunakan Bahasa Indonesia yang natural dan ramah, kecuali pengguna memilih bahasa lain.
- Jika pengguna dalam kondisi darurat, sarankan untuk segera menghubungi tenaga profesional.
- Jangan mengaku sebagai tenaga kesehatan profesional.
- Jawab dengan singkat dan mudah dipahami.";

/// `[Konteks pengguna: Nama=..., Usia=..., Bahasa=...]`, omitting unknown fields
pub fn personalization(profile: &ChatProfile) -> String {
    let mut fields = Vec::with_capacity(3);

    if let Some(name) = profile.display_name.as_deref().map(str::trim) {
        if !name.is_empty() {
            fields.push(format!("Nama={}", name));
        }
    }
    if let Some(age) = profile.age {
        fields.push(format!("Usia={}", age));
    }
    fields.push(format!("Bahasa={}", profile.language));

    format!("[Konteks pengguna: {}]", fields.join(", "))
}

/// Persona followed by the personalization fragment when a profile exists
pub fn system_instruction(persona: &str, profile: Option<&ChatProfile>) -> String {
    match profile {
        Some(profile) => format!("{}\n\n{}", persona, personalization(profile)),
        None => persona.to_string(),
    }
}

/// The last `window` messages other than `current`, oldest first, as model turns
pub fn history_window(messages: Vec<ChatMessage>, current: Uuid, window: usize) -> Vec<LlmMessage> {
    let mut prior: Vec<ChatMessage> = messages.into_iter().filter(|m| m.id != current).collect();
    let skip = prior.len().saturating_sub(window);

    prior
        .drain(skip..)
        .map(|m| match m.role {
            MessageRole::User => LlmMessage::user(m.content),
            MessageRole::Ai => LlmMessage::assistant(m.content),
        })
        .collect()
}
