use axum::Json;
use serde::Serialize;

/// Timestamp reported with the canned lead list.
const GENERATED_AT: &str = "2025-01-15T10:30:00Z";

#[derive(Debug, Clone, Serialize)]
pub struct Lead {
    pub id: u32,
    pub name: &'static str,
    pub company: &'static str,
    pub title: &'static str,
    pub email: &'static str,
    pub linkedin: &'static str,
    pub company_size: &'static str,
    pub industry: &'static str,
    pub location: &'static str,
    pub insight: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LeadBatch {
    pub leads: Vec<Lead>,
    pub total: usize,
    pub generated_at: &'static str,
}

#[derive(Debug, Serialize)]
pub struct GenerateLeadsResponse {
    pub success: bool,
    pub data: LeadBatch,
}

// Placeholder until a prospect data provider is wired in; the request body
// is not read.
pub async fn generate_leads() -> Json<GenerateLeadsResponse> {
    let leads = sample_leads();

    Json(GenerateLeadsResponse {
        success: true,
        data: LeadBatch {
            total: leads.len(),
            leads,
            generated_at: GENERATED_AT,
        },
    })
}

fn sample_leads() -> Vec<Lead> {
    vec![
        Lead {
            id: 1,
            name: "Sarah Johnson",
            company: "TechFlow Solutions",
            title: "Project Manager",
            email: "sarah.j@techflow.io",
            linkedin: "https://linkedin.com/in/sarahjohnson",
            company_size: "150 employees",
            industry: "Software Development",
            location: "San Francisco, CA",
            insight: "Recently expanded remote team to 50+ developers",
        },
        Lead {
            id: 2,
            name: "Michael Chen",
            company: "Nova Digital",
            title: "Director of Operations",
            email: "m.chen@novadigital.com",
            linkedin: "https://linkedin.com/in/michaelchen",
            company_size: "85 employees",
            industry: "Marketing Agency",
            location: "Austin, TX",
            insight: "Managing 15+ client campaigns simultaneously",
        },
        Lead {
            id: 3,
            name: "Emily Rodriguez",
            company: "Spark Creative",
            title: "Marketing Team Lead",
            email: "e.rodriguez@sparkcreative.co",
            linkedin: "https://linkedin.com/in/emilyrodriguez",
            company_size: "45 employees",
            industry: "Creative Agency",
            location: "New York, NY",
            insight: "Looking to streamline client collaboration workflows",
        },
    ]
}
