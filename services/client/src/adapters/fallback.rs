//! services/client/src/adapters/fallback.rs
//!
//! Built-in sample listings used when the backend cannot be reached and
//! `MOCK_FALLBACK` is enabled.

use portfolio_core::domain::{Project, WorkExperience};

#[allow(clippy::too_many_arguments)]
fn sample_project(
    id: i64,
    name: &str,
    kind: &str,
    image: &str,
    complexity: &str,
    year: i32,
    languages: &str,
    description: &str,
    repo: &str,
) -> Project {
    Project {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        description: Some(description.to_string()),
        year: Some(year),
        languages: Some(languages.to_string()),
        github: Some(format!("https://github.com/example/{repo}")),
        image: image.to_string(),
        images: vec![image.to_string()],
        complexity: Some(complexity.to_string()),
        rank: Some(id),
    }
}

pub fn sample_projects() -> Vec<Project> {
    vec![
        sample_project(
            1,
            "AI-Powered Analytics Dashboard",
            "Web Application",
            "https://images.pexels.com/photos/270348/pexels-photo-270348.jpeg",
            "Advanced",
            2024,
            "React,TypeScript,Python,TensorFlow",
            "A comprehensive analytics dashboard that leverages machine learning to provide predictive insights and real-time data visualization.",
            "ai-analytics",
        ),
        sample_project(
            2,
            "Blockchain Voting System",
            "Blockchain Application",
            "https://images.pexels.com/photos/8566526/pexels-photo-8566526.jpeg",
            "Expert",
            2023,
            "Solidity,React,Web3.js,Node.js",
            "A secure, transparent voting system built on Ethereum blockchain ensuring immutable and verifiable election results.",
            "blockchain-voting",
        ),
        sample_project(
            3,
            "Real-time Collaboration Tool",
            "Web Application",
            "https://images.pexels.com/photos/3184465/pexels-photo-3184465.jpeg",
            "Advanced",
            2023,
            "React,Socket.io,Node.js,MongoDB",
            "A real-time collaborative workspace with live editing, video calls, and project management features.",
            "collab-tool",
        ),
    ]
}

fn sample_experience(
    id: &str,
    title: &str,
    company: &str,
    location: &str,
    date_range: &str,
    details: &[&str],
) -> WorkExperience {
    WorkExperience {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        date_range: date_range.to_string(),
        details: details.iter().map(|d| d.to_string()).collect(),
    }
}

pub fn sample_experiences() -> Vec<WorkExperience> {
    vec![
        sample_experience(
            "1",
            "Senior Full Stack Developer",
            "TechCorp Innovation",
            "San Francisco, CA",
            "2022 - Present",
            &[
                "Led development of microservices architecture serving 1M+ users",
                "Implemented AI-driven features that increased user engagement by 40%",
                "Mentored team of 5 junior developers",
            ],
        ),
        sample_experience(
            "2",
            "Full Stack Developer",
            "StartupX",
            "Austin, TX",
            "2020 - 2022",
            &[
                "Built MVP from ground up using React, Node.js, and PostgreSQL",
                "Developed real-time features using WebSockets and Redis",
            ],
        ),
        sample_experience(
            "3",
            "Software Engineer",
            "Global Solutions Inc",
            "Remote",
            "2018 - 2020",
            &[
                "Optimized database queries reducing response time by 60%",
                "Implemented automated testing suite with 90% code coverage",
            ],
        ),
    ]
}
