use std::sync::OnceLock;

use crate::{PromptError, PromptTemplate};

const MISSION_STATEMENT_SYSTEM: &str = r#"You are an expert product strategist helping entrepreneurs define their MVP. Your role is to analyze the product idea and provide a structured response in HTML format. If user asks about anything else apart from the product development, just say "I don't know".

IMPORTANT: Output the HTML directly without any markdown code block markers (do not use ```html or ```).

Follow these guidelines:
1. Use semantic HTML elements
2. Include proper heading hierarchy
3. Use lists for better organization
4. Keep the content concise and actionable

Your output should follow this structure (output this directly, not in a code block):
<article>
  <section class="mission">
    <h3>Mission Statement</h3>
    <p>[2-3 sentences that capture what the product does, who it serves, the problem it solves, and what makes it unique]</p>
  </section>

  <section class="mvp-strategy">
    <h3>MVP Strategy</h3>

    <div class="core-features">
      <h4>Core Features</h4>
      <ul>
        <li>[Feature 1]</li>
        <li>[Feature 2]</li>
        <li>[Feature 3]</li>
      </ul>
    </div>

    <div class="technical-requirements">
      <h4>Technical Requirements</h4>
      <ul>
        <li>[Requirement 1]</li>
        <li>[Requirement 2]</li>
      </ul>
    </div>

    <div class="target-users">
      <h4>Target Users</h4>
      <ul>
        <li>[User Type 1]</li>
        <li>[User Type 2]</li>
      </ul>
    </div>

    <div class="success-metrics">
      <h4>Key Success Metrics</h4>
      <ul>
        <li>[Metric 1]</li>
        <li>[Metric 2]</li>
      </ul>
    </div>
  </section>
</article>

Keep the tone professional but inspiring, and ensure all suggestions are actionable and focused on rapid validation."#;

const MISSION_STATEMENT_USER: &str = "Based on this product idea:

{{productIdea}}

Provide a structured HTML response with:
1. A compelling mission statement
2. A focused MVP strategy including core features, technical requirements, target users, and key metrics";

const PRODUCT_DESCRIPTION_SYSTEM: &str = "You are a skilled product copywriter who creates compelling, benefit-focused product descriptions. Follow these principles:
- Lead with the most compelling benefit
- Use vivid, descriptive language
- Highlight unique selling points
- Include specific features and their benefits
- Maintain the brand's tone of voice";

const PRODUCT_DESCRIPTION_USER: &str = "Write a product description for {{productName}}, a {{category}} product.
Key details to include:
- Main benefit: {{mainBenefit}}
- Key features: {{features}}
- Target user: {{targetUser}}
- Price point: {{pricePoint}}
- Brand tone: {{brandTone}}";

/// Fixed, ordered catalog of prompt templates.
#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    templates: Vec<PromptTemplate>,
}

impl TemplateRegistry {
    pub fn new(templates: Vec<PromptTemplate>) -> Self {
        Self { templates }
    }

    /// The catalog shipped with the application, built on first use.
    pub fn builtin() -> &'static TemplateRegistry {
        static BUILTIN: OnceLock<TemplateRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| TemplateRegistry::new(builtin_templates()))
    }

    pub fn get(&self, id: &str) -> Result<&PromptTemplate, PromptError> {
        self.templates
            .iter()
            .find(|template| template.id == id)
            .ok_or_else(|| PromptError::TemplateNotFound {
                template_id: id.to_string(),
            })
    }

    pub fn list(&self) -> &[PromptTemplate] {
        &self.templates
    }
}

/// Looks up a template in the built-in catalog.
pub fn get_template_by_id(id: &str) -> Result<&'static PromptTemplate, PromptError> {
    TemplateRegistry::builtin().get(id)
}

fn builtin_templates() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate {
            id: "mission-statement".to_string(),
            name: "MVP Mission Statement Generator".to_string(),
            description:
                "Creates a focused mission statement and MVP strategy based on your product idea"
                    .to_string(),
            system_message: MISSION_STATEMENT_SYSTEM.to_string(),
            user_template: MISSION_STATEMENT_USER.to_string(),
            variables: vec!["productIdea".to_string()],
        },
        PromptTemplate {
            id: "product-description".to_string(),
            name: "Product Description Generator".to_string(),
            description: "Creates engaging product descriptions with key features and benefits"
                .to_string(),
            system_message: PRODUCT_DESCRIPTION_SYSTEM.to_string(),
            user_template: PRODUCT_DESCRIPTION_USER.to_string(),
            variables: [
                "productName",
                "category",
                "mainBenefit",
                "features",
                "targetUser",
                "pricePoint",
                "brandTone",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        },
    ]
}
