use chrono::{Duration, Utc};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use talent_hub::error::AppError;
use talent_hub::identity::{Passwords, Session, TokenIssuer};
use talent_hub::store::SqliteStore;
use talent_hub::talent::domain::{
    ActivityLog, ApplicationDraft, ApplicationId, ApplicationStatus, CompanyDraft, Credentials,
    InterviewDraft, JobOfferDraft, ProfileRegistration,
};
use talent_hub::talent::{MeetingLinkFactory, ServiceError, TalentApi};

const DEMO_PASSWORD: &str = "demo-password";

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Number of recruits applying to the demo offer
    #[arg(long, default_value_t = 3)]
    pub(crate) applicants: usize,
    /// How many of those applications get an interview before the offer is withdrawn
    #[arg(long, default_value_t = 1)]
    pub(crate) interviews: usize,
    /// Base URL used for the generated meeting links
    #[arg(long, default_value = "https://meetings.talent-hub.dev")]
    pub(crate) meeting_base_url: String,
    /// Print the outcome as JSON instead of a readable summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            applicants: 3,
            interviews: 1,
            meeting_base_url: "https://meetings.talent-hub.dev".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DemoOutcome {
    pub(crate) company: String,
    pub(crate) job_offer_id: i64,
    pub(crate) applications: Vec<(ApplicationId, ApplicationStatus)>,
    pub(crate) rejected_applications: Vec<ApplicationId>,
    pub(crate) activity: Vec<ActivityLog>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let json = args.json;
    let outcome = simulate(&args)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render(&outcome);
    }
    Ok(())
}

/// Creates a company and an offer, collects applications, schedules interviews
/// and then withdraws the offer, all on a scratch in-memory database.
pub(crate) fn simulate(args: &DemoArgs) -> Result<DemoOutcome, AppError> {
    let store = Arc::new(SqliteStore::in_memory()?);
    let api = TalentApi::new(
        store,
        Passwords::new(19_456, 2)?,
        TokenIssuer::new("demo-secret", Duration::minutes(15)),
        MeetingLinkFactory::new(args.meeting_base_url.clone()),
        false,
    );

    api.profiles
        .register_recruiter(&registration("hiring@acme.example", "Rita", "Hale"))?;
    let recruiter = login(&api, "hiring@acme.example")?;
    let company = api.companies.create(
        &recruiter,
        &CompanyDraft {
            name: "Acme Robotics".to_string(),
            industry: Some("Manufacturing".to_string()),
            phone_number: "+1 555 0100".to_string(),
            email_address: "careers@acme.example".to_string(),
            address: "1 Foundry Lane".to_string(),
            website: "https://acme.example".to_string(),
        },
    )?;
    let offer = api.job_offers.create(
        &recruiter,
        &JobOfferDraft {
            title: "Firmware Engineer".to_string(),
            description: "Embedded Rust on motor controllers".to_string(),
            location: "Porto".to_string(),
            salary: 68_000.0,
            experience_id: 2,
        },
    )?;

    let mut submitted = Vec::with_capacity(args.applicants);
    for n in 1..=args.applicants {
        let email = format!("candidate{n}@mail.example");
        api.profiles
            .register_recruit(&registration(&email, "Candidate", &n.to_string()))?;
        let recruit = login(&api, &email)?;
        let application = api.applications.create(
            &recruit,
            &ApplicationDraft {
                job_offer_id: offer.id,
            },
        )?;
        submitted.push((recruit, application.id));
    }

    for (n, (_, application_id)) in submitted.iter().take(args.interviews).enumerate() {
        api.interviews.create(
            &recruiter,
            &InterviewDraft {
                application_id: *application_id,
                location: None,
                date: Utc::now() + Duration::days(7 + n as i64),
                phone: None,
                email: Some("careers@acme.example".to_string()),
                online: true,
                start_time: Some("10:00".to_string()),
            },
        )?;
    }

    let removal = api.job_offers.delete(&recruiter, offer.id)?;

    let mut applications = Vec::with_capacity(submitted.len());
    for (recruit, id) in &submitted {
        let application = api.applications.get(recruit, *id)?;
        applications.push((application.id, application.status));
    }

    Ok(DemoOutcome {
        company: company.name,
        job_offer_id: offer.id,
        applications,
        rejected_applications: removal.rejected_applications,
        activity: api.activity.recent(100)?,
    })
}

fn registration(email: &str, firstname: &str, lastname: &str) -> ProfileRegistration {
    ProfileRegistration {
        email: email.to_string(),
        password: DEMO_PASSWORD.to_string(),
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        phone: None,
    }
}

fn login(api: &TalentApi<SqliteStore>, email: &str) -> Result<Session, ServiceError> {
    let outcome = api.identity.authenticate(&Credentials {
        email: email.to_string(),
        password: DEMO_PASSWORD.to_string(),
    })?;
    api.identity.verify(&outcome.token)
}

fn render(outcome: &DemoOutcome) {
    println!("Talent Hub demo");
    println!(
        "\n{} posted job offer #{} and then withdrew it.",
        outcome.company, outcome.job_offer_id
    );

    println!("\nApplications after withdrawal");
    for (id, status) in &outcome.applications {
        let note = if outcome.rejected_applications.contains(id) {
            " (rejected with the offer)"
        } else {
            ""
        };
        println!("  - #{id}: {status}{note}");
    }

    println!("\nActivity log (newest first)");
    for entry in &outcome.activity {
        println!(
            "  {} user #{} {}: {}",
            entry.created_at.format("%H:%M:%S"),
            entry.user_id,
            entry.action,
            entry.description
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_args(applicants: usize, interviews: usize) -> DemoArgs {
        DemoArgs {
            applicants,
            interviews,
            ..DemoArgs::default()
        }
    }

    #[test]
    fn withdrawal_rejects_only_applications_still_pending() {
        let outcome = simulate(&quick_args(3, 1)).expect("demo runs");

        assert_eq!(outcome.applications.len(), 3);
        assert_eq!(outcome.applications[0].1, ApplicationStatus::Interview);
        assert!(outcome.applications[1..]
            .iter()
            .all(|(_, status)| *status == ApplicationStatus::Rejected));
        assert_eq!(outcome.rejected_applications.len(), 2);
        assert_eq!(outcome.activity[0].action, "JOB_OFFER_DELETED");
    }

    #[test]
    fn demo_without_applicants_still_withdraws_the_offer() {
        let outcome = simulate(&quick_args(0, 3)).expect("demo runs");
        assert!(outcome.applications.is_empty());
        assert!(outcome.rejected_applications.is_empty());
        assert_eq!(outcome.activity[0].action, "JOB_OFFER_DELETED");
    }
}
