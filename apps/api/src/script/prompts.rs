// Prompt template for the Script Orchestrator.

use crate::llm_client::prompts::fill_template;

/// Cold-call script prompt. Replace `{name}`, `{address}`, `{reviews}`,
/// `{phone}` and `{niche}` before sending.
pub const SCRIPT_PROMPT_TEMPLATE: &str = "You are a Moroccan sales copywriter for MarqGrowth.
Write a short, natural, high-converting cold call script in French (Moroccan business tone).

Business: {name}
City/Address: {address}
Reviews: {reviews}
Phone: {phone}
Offer type: {niche}

Goal: book a 10–15 minute discovery call.

Rules:
- Sound human, not pushy.
- Under 150 words.
- Mention their reviews/reputation if available.
- End with an easy question (today vs tomorrow / WhatsApp ok?).
- Return ONLY the script text (no title, no bullets).";

pub fn build_script_prompt(
    name: &str,
    address: &str,
    reviews: &str,
    phone: &str,
    niche: &str,
) -> String {
    fill_template(
        SCRIPT_PROMPT_TEMPLATE,
        &[
            ("name", name),
            ("address", address),
            ("reviews", reviews),
            ("phone", phone),
            ("niche", niche),
        ],
    )
}
