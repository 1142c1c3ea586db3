// Cover-letter prompt text and the canned letters used when the LLM is
// unreachable.

use crate::models::user::AiTone;

/// System message for every cover-letter completion.
pub const COVER_LETTER_SYSTEM: &str = "You are an assistant that writes cover letters \
    for job applications. Write professional, persuasive letters in Russian.";

/// Cover-letter prompt. Replace `{resume}`, `{vacancy}` and `{tone}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for a job application.

Candidate resume:
{resume}

Vacancy description:
{vacancy}

Letter requirements:
- Tone: {tone}
- Language: Russian
- Length: 2-3 paragraphs
- Name concrete skills from the resume that fit the vacancy
- Show interest in the position
- Finish with a call to action

Write the letter:"#;

/// Tone instruction line embedded in the prompt.
pub fn tone_instruction(tone: AiTone) -> &'static str {
    match tone {
        AiTone::Professional => "professional and businesslike",
        AiTone::Enthusiastic => "enthusiastic and energetic",
        AiTone::Formal => "formal and official",
        AiTone::Friendly => "friendly and open",
    }
}

/// Opening adverb of the canned letter for each tone.
fn fallback_opener(tone: AiTone) -> &'static str {
    match tone {
        AiTone::Professional => "Профессионально",
        AiTone::Enthusiastic => "С энтузиазмом",
        AiTone::Formal => "Формально",
        AiTone::Friendly => "Дружелюбно",
    }
}

pub fn build_cover_letter_prompt(resume: &str, vacancy: &str, tone: AiTone) -> String {
    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("{resume}", resume.trim()),
            ("{vacancy}", vacancy.trim()),
            ("{tone}", tone_instruction(tone)),
        ],
    )
}

/// Substitutes placeholders in a single left-to-right pass. Inserted values
/// are copied as-is and never scanned for placeholders themselves.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Static letter returned when generation fails. Never empty.
pub fn fallback_letter(tone: AiTone) -> String {
    format!(
        "Здравствуйте!\n\n\
        {} обращаюсь к вам по поводу вакансии. Изучив описание позиции, я убежден, \
        что мой опыт и навыки, указанные в резюме, соответствуют вашим требованиям.\n\n\
        Буду рад возможности обсудить детали сотрудничества на собеседовании.\n\n\
        С уважением",
        fallback_opener(tone)
    )
}
