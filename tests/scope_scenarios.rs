//! Question suites run against a server holding the interview guide.
//!
//! Answerable questions must come back grounded and carry the facts the guide
//! states. Everything else must come back as the exact refusal literal.

mod common;

use docent::testing::{INTERVIEW_GUIDE, INTERVIEW_GUIDE_NAME};
use docent::{OUT_OF_SCOPE_RESPONSE, Provenance};

use common::harness::{TestServer, TestServerConfig, spawn_test_server};
use common::http_client::TestClient;

const ANSWERABLE: &[(&str, &str)] = &[
    ("How many interviews are there?", "5"),
    ("How many interveiws are there?", "5"),
    ("What are the four focus areas?", "googleyness"),
    ("What are the focas areas?", "leadership"),
    ("What data structures should I know?", "arrays"),
    ("Which programming languages are mentioned?", "java"),
    ("What are the common pitfalls?", "jumping into design"),
    ("How long are the interviews?", "45-60"),
    ("What is the interview duration?", "45-60 minutes"),
    ("What about SQL questions?", "sql"),
    ("Any advice for the interview?", "advice"),
    ("What platform is used for interviews?", "hangouts"),
    ("What happens in the interview?", "interview"),
    ("What are typical interview tips?", "tips"),
];

/// More ways of asking the same things; each must come back grounded.
const REPHRASED: &[&str] = &[
    "What is the total number of interviews?",
    "Number of interview rounds?",
    "Tell me about the focus areas",
    "What are the interview focus areas?",
    "Which data structures are important?",
    "Data structures for coding interview?",
    "Which programming languages to use?",
    "What languages are recommended?",
    "What pitfalls should I avoid?",
    "Common interview mistakes?",
    "How long does each interview last?",
    "Where are interviews conducted?",
    "Interview platform details?",
    "How does the interview work?",
    "What tips are given?",
    "Interview preparation tips?",
    "What algorithms should I know?",
    "What algorithm topics are covered?",
    "Tell me about SQL in interviews",
    "What SQL topics to study?",
    "google interview",
    "coding interview",
];

const UNRELATED: &[&str] = &[
    "What is the weather today?",
    "Will it rain tomorrow?",
    "How do I cook pasta?",
    "What is the capital of France?",
    "Tell me about quantum physics",
    "How does gravity work?",
    "Tell me about machine learning",
    "What is the meaning of life?",
    "How to lose weight?",
    "What books should I read?",
    "What is photosynthesis?",
    "How to build a website?",
    "What is cloud computing?",
    "Tell me about music",
    "Cooking tips for beginners?",
    "asdfghjkl",
    "123456789",
    "",
    "   ",
    "!@#$%^&*()",
];

const OTHER_COMPANIES: &[&str] = &[
    "How many rounds in Microsoft interview?",
    "Tell me about Facebook interview",
    "What about Amazon interview process?",
    "How to prepare for a Microsoft interview?",
    "Apple interview questions",
    "Netflix interview tips?",
    "Amazon interview duration?",
    "Facebook interview platform?",
    "Apple interview focus areas?",
    "microsoft interview process",
    "how many interview rounds does microsoft have",
    "interview rounds at amazon",
    "what are the interview focus areas at netflix",
    "How many interview rounds at amazon?",
    "Netflix interview experience",
];

const OTHER_INTERVIEW_KINDS: &[&str] = &[
    "Panel interview tips?",
    "Video interview best practices?",
    "Group interview strategies?",
    "How to prepare for phone interview?",
    "How to answer behavioral questions?",
    "Technical interview vs behavioral?",
    "What to wear for an interview?",
    "How to follow up after interview?",
    "How to negotiate salary?",
];

async fn guide_server() -> (TestServer, TestClient) {
    let server = spawn_test_server(TestServerConfig::default())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());
    client
        .upload(INTERVIEW_GUIDE_NAME, INTERVIEW_GUIDE)
        .await
        .expect("Guide should upload");
    (server, client)
}

async fn assert_refused(client: &TestClient, questions: &[&str]) {
    for question in questions {
        let (reply, status) = client.chat(question).await.expect("Chat should succeed");
        assert_eq!(reply.response, OUT_OF_SCOPE_RESPONSE, "{question:?}");
        assert_eq!(reply.source, Provenance::OutOfScope, "{question:?}");
        assert_eq!(status, "out_of_scope", "{question:?}");
    }
}

#[tokio::test]
async fn test_answerable_questions_are_grounded() {
    let (_server, client) = guide_server().await;

    for (question, fact) in ANSWERABLE {
        let (reply, status) = client.chat(question).await.expect("Chat should succeed");
        assert_eq!(reply.source, Provenance::Documents, "{question:?}");
        assert_eq!(status, "grounded", "{question:?}");
        assert_ne!(reply.response, OUT_OF_SCOPE_RESPONSE, "{question:?}");
        assert!(
            reply.response.to_lowercase().contains(fact),
            "{question:?} should mention {fact:?}, got {:?}",
            reply.response
        );
    }
}

#[tokio::test]
async fn test_rephrased_questions_are_grounded() {
    let (_server, client) = guide_server().await;

    for question in REPHRASED {
        let (reply, status) = client.chat(question).await.expect("Chat should succeed");
        assert_eq!(reply.source, Provenance::Documents, "{question:?}");
        assert_eq!(status, "grounded", "{question:?}");
        assert_ne!(reply.response, OUT_OF_SCOPE_RESPONSE, "{question:?}");
    }
}

#[tokio::test]
async fn test_unrelated_questions_are_refused() {
    let (_server, client) = guide_server().await;
    assert_refused(&client, UNRELATED).await;
}

#[tokio::test]
async fn test_other_companies_are_refused() {
    let (_server, client) = guide_server().await;
    assert_refused(&client, OTHER_COMPANIES).await;
}

#[tokio::test]
async fn test_other_interview_kinds_are_refused() {
    let (_server, client) = guide_server().await;
    assert_refused(&client, OTHER_INTERVIEW_KINDS).await;
}

#[tokio::test]
async fn test_generative_mode_refuses_the_same_questions() {
    let server = spawn_test_server(TestServerConfig::default().generative())
        .await
        .expect("Server should start");
    let client = TestClient::new(server.url());
    client
        .upload(INTERVIEW_GUIDE_NAME, INTERVIEW_GUIDE)
        .await
        .expect("Guide should upload");

    assert_refused(&client, OTHER_COMPANIES).await;
    assert_refused(&client, &UNRELATED[..5]).await;
}
