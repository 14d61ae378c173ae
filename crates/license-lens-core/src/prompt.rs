/// Version tag embedded in the prompt so schema drift is visible in captured
/// model transcripts.
pub const SCHEMA_VERSION: &str = "v1";

const PERSONA: &str = "You are an expert legal document analyzer specializing in license agreements. \
Your task is to analyze the following license agreement and provide a detailed analysis in JSON format. \
Focus on identifying key legal terms, potential risks, important clauses, advantages, and disadvantages.";

/// Build the analysis prompt for a document. Pure and deterministic: the same
/// document text always produces byte-identical output.
///
/// No truncation is applied here. Oversized documents are passed through
/// untouched; a backend input-size limit surfaces as a model invocation
/// failure, and any chunking policy belongs to the caller.
pub fn build_prompt(document_text: &str) -> String {
    format!(
        r#"{persona}

Please provide your analysis in the following JSON structure (schema {version}):
{{
    "key_points": ["The main terms, conditions, obligations, rights, and responsibilities"],
    "privacy_issues": ["Data collection practices, privacy-related concerns, and data sharing policies"],
    "major_concerns": ["Ambiguous terms, potentially harmful clauses, and unclear obligations"],
    "data_misuse": ["Potential data exploitation risks, concerning data usage terms, and privacy vulnerabilities"],
    "advantages": ["Beneficial terms, user protections, and favorable conditions"],
    "disadvantages": ["Unfavorable terms, potential limitations, and user restrictions"]
}}

License Agreement Text:
{text}

Important: Provide your response in valid JSON format without any markdown formatting."#,
        persona = PERSONA,
        version = SCHEMA_VERSION,
        text = document_text,
    )
}
