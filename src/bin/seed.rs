//! Seed tool: loads the demo catalog into MongoDB.
//!
//! Idempotent: a collection that already has documents is left untouched,
//! so re-running against a live database is safe.
//!
//! Usage: lectern-seed [--mongodb-uri ...] [--mongodb-db ...]

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lectern::config::Args;
use lectern::db::schemas::{
    AchievementDoc, AssessmentDoc, AssessmentQuestion, ModuleDoc, ModuleLevel,
    ACHIEVEMENT_COLLECTION, ASSESSMENT_COLLECTION, MODULE_COLLECTION,
};
use lectern::db::MongoClient;
use lectern::types::{LecternError, Result};

fn demo_modules() -> Vec<ModuleDoc> {
    vec![
        ModuleDoc::new(
            "Introduction to FinTech",
            "Learn the basics of financial technology.",
            ModuleLevel::Beginner,
            vec!["fintech".into(), "basics".into()],
        ),
        ModuleDoc::new(
            "Blockchain Fundamentals",
            "Understand the technology behind cryptocurrency.",
            ModuleLevel::Intermediate,
            vec!["blockchain".into(), "crypto".into()],
        ),
        ModuleDoc::new(
            "AI in Financial Services",
            "Explore how AI is revolutionizing finance.",
            ModuleLevel::Advanced,
            vec!["AI".into(), "machine learning".into(), "finance".into()],
        ),
    ]
}

fn demo_questions() -> Vec<AssessmentQuestion> {
    vec![
        AssessmentQuestion {
            question_id: "q1".into(),
            text: "What does FinTech stand for?".into(),
            options: vec![
                "Finance Technology".into(),
                "Financial Tools".into(),
                "Technology Funds".into(),
                "Future Tech".into(),
            ],
            correct_answer: "Finance Technology".into(),
        },
        AssessmentQuestion {
            question_id: "q2".into(),
            text: "Which is a blockchain-based currency?".into(),
            options: vec![
                "Bitcoin".into(),
                "PayPal".into(),
                "Visa".into(),
                "Stripe".into(),
            ],
            correct_answer: "Bitcoin".into(),
        },
    ]
}

fn demo_achievements() -> Vec<AchievementDoc> {
    vec![
        AchievementDoc::new(
            "Completed 1 Module",
            "Awarded for completing your first module.",
            1,
            0,
        ),
        AchievementDoc::new(
            "Finance Explorer",
            "Awarded after completing all beginner modules.",
            3,
            50,
        ),
        AchievementDoc::new("Quiz Master", "Score at least 80% on an assessment.", 0, 80),
    ]
}

async fn seed(mongo: &MongoClient) -> Result<()> {
    let modules = mongo.collection::<ModuleDoc>(MODULE_COLLECTION).await?;
    let assessments = mongo
        .collection::<AssessmentDoc>(ASSESSMENT_COLLECTION)
        .await?;
    let achievements = mongo
        .collection::<AchievementDoc>(ACHIEVEMENT_COLLECTION)
        .await?;

    let mut first_module_id = None;
    if modules.count(bson::doc! {}).await? > 0 {
        info!("Modules already present, skipping");
    } else {
        for module in demo_modules() {
            let title = module.title.clone();
            let id = modules.insert_one(module).await?;
            info!("Seeded module '{}' ({})", title, id);
            first_module_id.get_or_insert(id);
        }
    }

    if assessments.count(bson::doc! {}).await? > 0 {
        info!("Assessments already present, skipping");
    } else {
        match first_module_id {
            Some(module_id) => {
                let id = assessments
                    .insert_one(AssessmentDoc::new(module_id, demo_questions()))
                    .await?;
                info!("Seeded assessment {} for module {}", id, module_id);
            }
            None => {
                // Modules were pre-existing: no way to know which one the
                // demo quiz belongs to, so leave assessments alone.
                info!("Modules not seeded in this run, skipping assessment");
            }
        }
    }

    if achievements.count(bson::doc! {}).await? > 0 {
        info!("Achievements already present, skipping");
    } else {
        for achievement in demo_achievements() {
            let title = achievement.title.clone();
            achievements.insert_one(achievement).await?;
            info!("Seeded achievement '{}'", title);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), LecternError> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    seed(&mongo).await?;
    info!("Seeding complete");

    Ok(())
}
