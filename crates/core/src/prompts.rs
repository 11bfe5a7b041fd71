use providers::{ContentPart, GenerateRequest};

pub const IMAGE_PROMPT: &str = r#"You are a precise file categorisation assistant. Look at the image and return a JSON object with exactly two keys.

"category": exactly ONE of
  - "Photos": real-world photographs such as portraits, landscapes, food, events, products or nature
  - "Screenshots": captures of screens, web pages, desktop or mobile apps and software interfaces
  - "Diagrams & Charts": circuit diagrams, schematics, block diagrams, flowcharts, ER or UML diagrams, architecture or network diagrams, bar/pie/line charts, scatter plots, histograms, engineering drawings, graph plots, waveforms, timing diagrams, Gantt charts, mind maps
  - "Artwork & Design": illustrations, digital art, logos, icons, posters, UI mockups, design assets

"tags": an array of 3 to 5 lowercase tags describing the specific content,
  for example ["circuit diagram", "electronics", "resistors"] or ["bar chart", "sales data", "quarterly"]

Rules:
- Any technical drawing, graph or diagram is always "Diagrams & Charts", even if another category also fits.
- Reply with valid JSON only. No markdown, no code fences, no commentary.

Example: {"category": "Diagrams & Charts", "tags": ["circuit diagram", "electronics", "schematic", "resistors"]}"#;

pub fn document_prompt(file_name: &str, mime_type: &str) -> String {
    format!(
        r#"You are a file categorisation assistant. You cannot see the file; infer the most likely category and tags from its name and type alone.

File name: "{file_name}"
MIME type: "{mime_type}"

Return a JSON object with:
"category": exactly ONE of "Documents" or "PDFs"
"tags": an array of 3 to 5 lowercase tags inferred from the file name,
  for example ["invoice", "finance", "billing"] or ["research paper", "academic", "machine learning"]

Reply with valid JSON only. No markdown, no code fences, no commentary.
Example: {{"category": "PDFs", "tags": ["invoice", "finance", "2024"]}}"#
    )
}

/// Image bytes first, instructions second.
pub fn image_request(mime_type: &str, base64_data: String) -> GenerateRequest {
    GenerateRequest {
        parts: vec![
            ContentPart::inline(mime_type, base64_data),
            ContentPart::text(IMAGE_PROMPT),
        ],
    }
}

pub fn document_request(file_name: &str, mime_type: &str) -> GenerateRequest {
    GenerateRequest {
        parts: vec![ContentPart::text(document_prompt(file_name, mime_type))],
    }
}
