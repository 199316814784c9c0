// Catalog LLM prompt templates.

pub const STRUCTURE_LOAN_SYSTEM: &str = "\
You are a data assistant that structures scraped bank loan data into a consistent format. \
Amounts are in Indian rupees. Tenures are in months. Interest rates are annual percentages.";

pub const STRUCTURE_LOAN_PROMPT: &str = r#"Convert the raw loan data below into one structured JSON object.

RAW DATA:
{raw_data}

OUTPUT SCHEMA (return exactly this structure):
{
  "bankName": "string",
  "loanType": "Home Loan" | "Car Loan" | "Gold Loan" | "Personal Loan" | "Education Loan",
  "interestRate": number,           // lowest advertised annual rate
  "minTenure": integer,             // months
  "maxTenure": integer,             // months
  "minLoanAmount": number,
  "maxLoanAmount": number,
  "processingFee": "string",
  "eligibilityCriteria": ["string"],
  "requiredDocuments": ["string"],
  "benefits": ["string"],
  "specialFeatures": ["string"],
  "sourceUrl": "string"
}

RULES:
- Convert "lakh" (100,000) and "crore" (10,000,000) to plain numbers.
- Convert tenures given in years to months.
- Keep list items short, one criterion or document per item.
- Use an empty list when the data says nothing about a field."#;
