// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates for query clarification and route classification.

use agrox_core::ExtractedInfo;

/// Few-shot rewriting prompt. The model fills missing slots with `defaults`
/// and answers with the rewritten query only.
pub fn clarify_prompt(input: &str, defaults: &ExtractedInfo) -> String {
    let ExtractedInfo {
        crop,
        location,
        month,
    } = defaults;

    format!(
        r#"You are a farming assistant clarifier. Rewrite the query to include all necessary information.

Rules:
- If no crop mentioned, assume "{crop}"
- If no month mentioned, assume "{month}"
- If no location mentioned, assume "{location}"
- Keep original intent but make complete
- Output ONLY the clarified query

Examples:
Input: "which plant is good to grow in Onitsha south"
Output: Which plant is good to grow in Onitsha south in {month}?

Input: "soil pH for tomatoes"
Output: What is the soil pH requirement for tomatoes in {location} in {month}?

Input: "how to plant {crop}"
Output: How to plant {crop} in {location} in {month}?

Input: "{input}"
Output: "#
    )
}

/// Routing prompt asking for a single JSON object with ROUTE, REASON, CROP,
/// LOCATION, and MONTH.
pub fn route_prompt(original: &str, clarified: &str) -> String {
    format!(
        r#"You are a farming assistant router. Analyze the query and return JSON response.

DATA SOURCES:
- RAG: How-to guides, farming procedures, planting steps
- DATABASE: Soil properties, pH, nutrients, fertilizers, crop suitability for locations
- BOTH: Needs both farming procedures AND soil/location data

Respond in valid JSON format:
{{
  "ROUTE": "RAG or DATABASE or BOTH",
  "REASON": "brief explanation",
  "CROP": "extracted crop name",
  "LOCATION": "extracted location",
  "MONTH": "extracted month"
}}

Original: "{original}"
Clarified: "{clarified}"

JSON Response:"#
    )
}
