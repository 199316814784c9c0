// Application advice prompt templates.

pub const ADVICE_SYSTEM: &str = "\
You are a financial advisor specializing in Indian retail loan applications. \
Amounts are in Indian rupees. Tenures are in months. Interest rates are annual percentages.";

pub const ADVICE_PROMPT: &str = r#"Give advice for the loan application below.

APPLICATION:
{application}

Cover, under short headings:
1. How likely approval is, given the details provided
2. What would strengthen the application
3. Alternatives worth considering if this product is not a good fit
4. Tips for managing the loan if it is approved

Plain text only. Keep it under 300 words."#;
