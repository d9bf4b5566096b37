use crate::csv::ToCsv;
use crate::models::Expense;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseCsv {
    pub date: String,
    pub amount: f64,
    pub merchant: String,
    pub description: String,
    pub category: String,
    pub confidence: String,
}

impl From<&Expense> for ExpenseCsv {
    fn from(e: &Expense) -> Self {
        ExpenseCsv {
            // bill date when the receipt had one
            date: e
                .extracted_date
                .unwrap_or_else(|| e.created_at.date_naive())
                .to_string(),
            amount: e.amount,
            merchant: e.merchant_name.clone().unwrap_or_default(),
            description: e.description.clone(),
            category: e.category.clone().unwrap_or_default(),
            confidence: e.confidence.map(|it| it.to_string()).unwrap_or_default(),
        }
    }
}

impl ToCsv for ExpenseCsv {
    fn header_row() -> &'static str {
        "date,amount,merchant,description,category,confidence"
    }

    fn to_csv_row(&self) -> String {
        let ExpenseCsv {
            date,
            amount,
            merchant,
            description,
            category,
            confidence,
        } = self;

        let merchant = Self::format_csv_value(merchant);
        let description = Self::format_csv_value(description);
        let category = Self::format_csv_value(category);

        format!("{date},{amount},{merchant},{description},{category},{confidence}")
    }
}
