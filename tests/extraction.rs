mod common;

use bill_persona_connector::error::Error;
use bill_persona_connector::genai::{extract_bill, BillInput, ExtractionError, Role};
use bill_persona_connector::models::Confidence;
use common::{unavailable, ScriptedModel};

fn categories() -> Vec<String> {
    vec!["Ăn uống".to_string(), "Khác".to_string()]
}

#[tokio::test]
async fn image_extraction_sends_prompt_and_inline_image() {
    let model = ScriptedModel::replying(vec![Ok(r#"```json
{"amount": "120000", "description": "Đi chợ", "category": "Ăn uống", "confidence": "MEDIUM", "date": "2025-04-02"}
```"#
        .to_string())]);
    let input = BillInput::Image {
        bytes: b"fake-jpeg".to_vec(),
        mime_type: "image/jpeg".to_string(),
    };

    let extraction = extract_bill(model.as_ref(), &input, &categories()).await.unwrap();
    assert_eq!(extraction.amount, Some(120000.0));
    assert_eq!(extraction.category.as_deref(), Some("Ăn uống"));
    assert_eq!(extraction.confidence, Confidence::Medium);
    assert_eq!(extraction.date.map(|it| it.to_string()).as_deref(), Some("2025-04-02"));

    let request = &model.requests()[0];
    assert_eq!(request.contents.len(), 1);
    assert_eq!(request.contents[0].role, Role::User);
    assert_eq!(request.generation_config.response_mime_type, "application/json");
    let inline = request.contents[0].parts[1].inline_data.clone().unwrap();
    assert_eq!(inline.mime_type, "image/jpeg");
    assert_eq!(inline.data, "ZmFrZS1qcGVn");
}

#[tokio::test]
async fn extraction_errors_are_propagated() {
    let model = ScriptedModel::replying(vec![Ok("{not json}".to_string()), Err(unavailable())]);
    let input = BillInput::Text("Phở 45k".to_string());

    let invalid = extract_bill(model.as_ref(), &input, &categories()).await;
    assert!(matches!(invalid, Err(Error::Extraction(ExtractionError::InvalidJson(_)))));

    let offline = extract_bill(model.as_ref(), &input, &categories()).await;
    assert!(matches!(offline, Err(Error::Gemini { status: 503, .. })));
}
