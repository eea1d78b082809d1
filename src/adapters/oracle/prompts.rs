//! Prompt text for the three oracle contracts.

use serde_json::Value;
use std::fmt::Write;

use crate::domain::conversation::{ConversationLog, Speaker};
use crate::domain::draft::{DraftEntity, DraftSchema, EntityDefinition};
use crate::domain::search::{search_filter_schema, ListingCorpus};
use crate::domain::verification::VerificationArtifact;
use crate::ports::Message;

const JSON_ONLY: &str = "Respond with a single JSON object and nothing else.";

/// Maps the log onto chat messages, oldest first.
pub(super) fn transcript(log: &ConversationLog) -> Vec<Message> {
    log.turns()
        .iter()
        .map(|turn| match turn.speaker() {
            Speaker::Human => Message::user(turn.text()),
            Speaker::Assistant => Message::assistant(turn.text()),
        })
        .collect()
}

/// One line per declared leaf: `path (kind): label`.
fn field_catalogue(schema: &DraftSchema) -> String {
    let mut out = String::new();
    for path in schema.leaf_paths() {
        if let Some(spec) = schema.leaf(&path) {
            let _ = writeln!(out, "- {} ({}): {}", path, spec.kind, spec.label);
        }
    }
    out
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub(super) fn extraction_system_prompt(
    definition: &EntityDefinition,
    draft: &DraftEntity,
    answer_schema: &Value,
) -> String {
    let required: Vec<String> = definition
        .required()
        .fields()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You help a host describe their {} for a short-stay booking marketplace.",
        definition.kind()
    );
    let _ = writeln!(prompt, "\nFields you may fill, as path (type): meaning");
    prompt.push_str(&field_catalogue(definition.schema()));
    let _ = writeln!(prompt, "\nRequired fields, in the order to ask for them: {}", required.join(", "));
    let _ = writeln!(prompt, "\nAlready captured:\n{}", pretty(&draft.to_json()));
    let _ = writeln!(
        prompt,
        "\nRules:\n\
         - partialUpdate holds only values the host stated in their latest message, nested by namespace.\n\
         - Never repeat, clear or null out fields that are already captured.\n\
         - followUpPrompt asks for the first required field that is still missing.\n\
         - Once every required field is known, followUpPrompt must be exactly: {}",
        definition.confirmation()
    );
    let _ = writeln!(prompt, "\n{} It must match this JSON Schema:\n{}", JSON_ONLY, pretty(answer_schema));
    prompt
}

pub(super) fn verification_system_prompt(answer_schema: &Value) -> String {
    format!(
        "You check documents uploaded to a short-stay booking marketplace before a user's role is upgraded.\n\
         Judge whether the document is what the user says it is and whether it is legible and current.\n\
         When it is not acceptable, give a short rejectionReason the user can act on.\n\n\
         {} It must match this JSON Schema:\n{}",
        JSON_ONLY,
        pretty(answer_schema)
    )
}

/// The per-artifact message. The bytes themselves travel by handle.
pub(super) fn verification_request(artifact: &VerificationArtifact, handle: &str) -> String {
    format!(
        "Described as: {}\nMedia type: {}\nSize: {} bytes\nDocument: {}",
        artifact.described_kind(),
        artifact.media_type(),
        artifact.size(),
        handle
    )
}

pub(super) fn search_system_prompt(corpus: &ListingCorpus, answer_schema: &Value) -> String {
    let listings = serde_json::to_value(corpus.listings()).unwrap_or(Value::Null);

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You help a guest find a place to stay on a short-stay booking marketplace.\n\
         Recommend only listings from the list below and refer to them by id."
    );
    let _ = writeln!(prompt, "\nListings:\n{}", pretty(&listings));
    let _ = writeln!(prompt, "\nPreferences you may record in inferredFilters, as path (type): meaning");
    prompt.push_str(&field_catalogue(search_filter_schema()));
    let _ = writeln!(
        prompt,
        "\nRules:\n\
         - candidateIds lists the best matches first.\n\
         - narrative is a short, friendly reply to the guest's latest message.\n\
         - inferredFilters holds preferences the guest stated, nested by namespace."
    );
    let _ = writeln!(prompt, "\n{} It must match this JSON Schema:\n{}", JSON_ONLY, pretty(answer_schema));
    prompt
}
