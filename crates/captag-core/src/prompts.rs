//! Default captioning prompts, one per language.

use crate::types::Language;

const PROMPT_FI: &str = "Kuvaile tämä kuva yksityiskohtaisesti vaihtoehtoisena tekstinä. \
Kirjoita useita kokonaisia lauseita ja kuvaile kirjaimellisesti, mitä kuvassa näkyy: \
ihmiset, esineet, ympäristö, värit ja mahdollinen toiminta. \
Jos kuvassa on tekstiä, käännä se suomeksi. \
Vastaa pelkällä kuvauksella ilman johdantoa tai kommentteja.";

const PROMPT_SV: &str = "Beskriv den här bilden utförligt som alternativtext. \
Skriv flera hela meningar och beskriv bokstavligt vad som syns i bilden: \
människor, föremål, miljö, färger och eventuell aktivitet. \
Om bilden innehåller text, översätt den till svenska. \
Svara endast med beskrivningen, utan inledning eller kommentarer.";

const PROMPT_EN: &str = "Describe this image in detail as alternative text. \
Write several complete sentences describing literally what is visible in the image: \
people, objects, setting, colours and any activity. \
If the image contains text, translate it into English. \
Respond with the description only, without any introduction or commentary.";

/// Fixed default prompt for a language.
pub fn default_prompt(language: Language) -> &'static str {
    match language {
        Language::Fi => PROMPT_FI,
        Language::Sv => PROMPT_SV,
        Language::En => PROMPT_EN,
    }
}

/// Pick the prompt for a request: a non-blank override wins, otherwise the
/// language default.
pub fn select_prompt(language: Language, custom: Option<&str>) -> String {
    match custom.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default_prompt(language).to_string(),
    }
}
