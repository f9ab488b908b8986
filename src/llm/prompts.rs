//! Prompt templates for travel answers

use std::collections::HashMap;

/// Template with `{{name}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the placeholders; unknown ones are left as-is
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = self.template.clone();
        for var in &self.variables {
            if let Some(value) = values.get(var.as_str()) {
                result = result.replace(&format!("{{{{{var}}}}}"), value);
            }
        }
        result
    }

    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Placeholder names in order of first appearance
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() && !variables.iter().any(|v| v == name) {
            variables.push(name.to_string());
        }
        rest = &after[end + 2..];
    }

    variables
}

/// Fixed framings used by the travel assistant
pub struct TravelPrompts;

impl TravelPrompts {
    /// Grounded answer over retrieved places with per-place weather.
    ///
    /// Variables: `places`, `question`.
    #[must_use]
    pub fn grounded_answer() -> PromptTemplate {
        PromptTemplate::new(
            r"당신은 제주도 여행 전문 가이드 AI입니다.
아래 제공된 [관련 여행지 정보]만을 바탕으로 사용자의 질문에 답변하세요.

## 관련 여행지 정보 (각 장소별 현재 날씨 포함)
{{places}}

## 작성 규칙
1. 질문과 관련된 장소를 위 목록에서 찾아 구체적으로 설명하세요.
2. 목록에 없는 장소나 정보는 절대 지어내지 마세요. 찾는 정보가 없으면 솔직히 말하세요.
3. 현재 날씨(기온, 날씨 상태)를 고려하여 방문하기 좋은지 조언하세요. (예: 비오면 실내 추천)
4. 답변은 친절하게 하되, 100자 이내로 요약하여 문장이 끊기지 않게 하세요.

## 사용자 질문
{{question}}",
        )
    }
}
