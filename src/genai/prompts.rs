//! Prompt texts and the fixed Vietnamese strings shown to users.

/// Reply shown in the chat when the model call failed.
pub const CHAT_APOLOGY: &str =
    "Xin lỗi, tôi gặp sự cố khi xử lý câu hỏi của bạn. Vui lòng thử lại sau.";

/// Assistant line recorded for a new expense when the model gives nothing usable.
pub const EXPENSE_REPLY_FALLBACK: &str = "Tôi đã nhận được chi tiêu của bạn!";

/// Shown (not stored) when a user has no chat history yet.
pub const CHAT_WELCOME: &str = "Xin chào! Tôi là trợ lý AI của bạn. Tôi có thể giúp bạn quản lý chi tiêu, phân tích thói quen tiêu dùng, hoặc trả lời các câu hỏi về tài chính. Bạn cần tôi giúp gì?";

pub const ANALYSIS_FALLBACK_COMMENT: &str = "Đã ghi nhận khoản chi tiêu của bạn.";

pub const PUSH_TITLE: &str = "Trợ lý chi tiêu";

/// Persona used when the prompt document is missing or unreadable.
pub const DEFAULT_PERSONA_PROMPT: &str = r#"Bạn là trợ lý tài chính cá nhân vui tính và thẳng thắn, nói chuyện thân thiện bằng tiếng Việt.
Hãy nhận xét ngắn gọn (1-3 câu) về chi tiêu của người dùng dựa trên dữ liệu được cung cấp.
Khen khi chi tiêu hợp lý, nhắc nhở nhẹ nhàng khi chi tiêu cao hoặc gần vượt ngân sách.
Không dùng markdown."#;

const BILL_EXTRACTION_PROMPT: &str = r#"Read the bill and answer with JSON only. No markdown, no explanation.
{
  "amount": number (the total only),
  "merchantName": string,
  "description": string (short summary),
  "date": "YYYY-MM-DD" | null,
  "items": [{"name": string, "price": number (unit price), "quantity": number}] | null,
  "confidence": "high" | "medium" | "low",
  "category": one of [{CATEGORIES}] | null
}

high = clear bill, medium = some fields uncertain, low = unclear bill or missing information"#;

const ANALYSIS_PROMPT: &str = r#"Bạn là trợ lý tài chính thông minh, hãy phân tích khoản chi tiêu sau và đưa ra nhận xét ngắn gọn bằng tiếng Việt:

{EXPENSE}
{BUDGET}

Trả về JSON với format:
{
  "comment": "Nhận xét ngắn gọn, thân thiện về khoản chi (1-2 câu)",
  "sentiment": "positive|neutral|warning|negative",
  "suggestions": ["Gợi ý 1", "Gợi ý 2"] hoặc [],
  "financialTip": "Lời khuyên tài chính ngắn gọn" hoặc null
}

Quy tắc:
- comment: ngắn gọn, thân thiện, không dùng markdown
- sentiment: positive (hợp lý), neutral (bình thường), warning (hơi cao), negative (quá cao hoặc vượt ngân sách)
- suggestions: tối đa 2 gợi ý thực tế
- Chỉ trả về JSON"#;

pub fn bill_extraction_prompt(categories: &[String]) -> String {
    let categories = categories
        .iter()
        .map(|it| format!("\"{}\"", it))
        .collect::<Vec<_>>()
        .join(", ");
    BILL_EXTRACTION_PROMPT.replace("{CATEGORIES}", &categories)
}

pub fn analysis_prompt(expense_block: &str, budget_block: &str) -> String {
    ANALYSIS_PROMPT
        .replace("{EXPENSE}", expense_block)
        .replace("{BUDGET}", budget_block)
}

/// Formats an amount the way vi-VN renders numbers: `.` groups thousands,
/// `,` separates at most three fraction digits.
pub fn format_vnd(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = (amount.abs() * 1000.0).round() / 1000.0;
    let integer = rounded.trunc() as u64;
    let fraction = ((rounded - rounded.trunc()) * 1000.0).round() as u64;

    let digits = integer.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if fraction > 0 {
        let fraction = format!("{:03}", fraction);
        grouped.push(',');
        grouped.push_str(fraction.trim_end_matches('0'));
    }

    if negative && grouped != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_vi_vn_locale() {
        assert_eq!(format_vnd(0.0), "0");
        assert_eq!(format_vnd(999.0), "999");
        assert_eq!(format_vnd(50000.0), "50.000");
        assert_eq!(format_vnd(1234567.0), "1.234.567");
        assert_eq!(format_vnd(1500.5), "1.500,5");
        assert_eq!(format_vnd(-25000.0), "-25.000");
    }

    #[test]
    fn extraction_prompt_lists_categories() {
        let prompt = bill_extraction_prompt(&["Ăn uống".to_string(), "Khác".to_string()]);
        assert!(prompt.contains(r#"one of ["Ăn uống", "Khác"]"#));
        assert!(!prompt.contains("{CATEGORIES}"));
    }
}
