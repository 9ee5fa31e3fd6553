use super::common::*;
use crate::store::Store;
use crate::talent::domain::{
    ApplicationDraft, ApplicationStatus, JobOfferFilter, JobOfferUpdate, Role,
};
use crate::talent::ServiceError;

#[test]
fn only_main_recruiters_with_a_company_may_create_offers() {
    let fx = fixture();
    let (main, company) = fx.main_recruiter("main@acme.test", "Acme");

    let (member, member_profile) = fx.recruiter("member@acme.test");
    fx.api
        .companies
        .add_member(&main, company.id, member_profile.id)
        .expect("member added");
    assert_forbidden(fx.api.job_offers.create(&member, &offer_draft("Engineer")));

    let (loner, _) = fx.recruiter("loner@nowhere.test");
    assert_forbidden(fx.api.job_offers.create(&loner, &offer_draft("Engineer")));

    let (recruit, _) = fx.recruit("x@mail.test");
    assert_forbidden(fx.api.job_offers.create(&recruit, &offer_draft("Engineer")));

    let offer = fx.offer(&main, "Engineer");
    assert_eq!(offer.company_id, company.id);
    assert_eq!(offer.experience, "1-2 years");
    assert_eq!(fx.activity_count("JOB_OFFER_CREATED"), 1);
}

#[test]
fn members_cannot_update_or_delete_offers() {
    let fx = fixture();
    let (main, company) = fx.main_recruiter("main@acme.test", "Acme");
    let offer = fx.offer(&main, "Engineer");
    let (member, member_profile) = fx.recruiter("member@acme.test");
    fx.api
        .companies
        .add_member(&main, company.id, member_profile.id)
        .expect("member added");

    let changes = JobOfferUpdate {
        title: Some("Staff Engineer".to_string()),
        ..JobOfferUpdate::default()
    };
    assert_forbidden(fx.api.job_offers.update(&member, offer.id, &changes));
    assert_forbidden(fx.api.job_offers.delete(&member, offer.id));

    let unchanged = fx.api.job_offers.get(&member, offer.id).expect("member can read");
    assert_eq!(unchanged.title, "Engineer");
}

#[test]
fn main_recruiter_of_another_company_affects_nothing() {
    let fx = fixture();
    let (acme, _) = fx.main_recruiter("main@acme.test", "Acme");
    let (globex, _) = fx.main_recruiter("main@globex.test", "Globex");
    let offer = fx.offer(&acme, "Engineer");
    let (recruit, _) = fx.recruit("x@mail.test");
    let application = fx
        .api
        .applications
        .create(&recruit, &ApplicationDraft { job_offer_id: offer.id })
        .expect("applied");

    let changes = JobOfferUpdate {
        salary: Some(1.0),
        ..JobOfferUpdate::default()
    };
    assert_not_found(fx.api.job_offers.update(&globex, offer.id, &changes));
    assert_not_found(fx.api.job_offers.delete(&globex, offer.id));
    assert_not_found(fx.api.job_offers.get(&globex, offer.id));

    let still_pending = fx.api.applications.get(&recruit, application.id).expect("readable");
    assert_eq!(still_pending.status, ApplicationStatus::Pending);
    assert_eq!(fx.api.job_offers.get(&acme, offer.id).expect("intact").salary, 60_000.0);
    assert_eq!(fx.activity_count("APPLICATION_REJECTED"), 0);
    assert_eq!(fx.activity_count("JOB_OFFER_DELETED"), 0);
}

#[test]
fn deleting_an_offer_rejects_exactly_the_pending_applications() {
    let fx = fixture();
    let (main, _) = fx.main_recruiter("main@acme.test", "Acme");
    let offer = fx.offer(&main, "Engineer");
    let other_offer = fx.offer(&main, "Designer");

    let mut pending = Vec::new();
    for n in 0..3 {
        let (recruit, _) = fx.recruit(&format!("pending{n}@mail.test"));
        let application = fx
            .api
            .applications
            .create(&recruit, &ApplicationDraft { job_offer_id: offer.id })
            .expect("applied");
        pending.push(application.id);
    }

    let mut settled = Vec::new();
    for (n, status) in [ApplicationStatus::Accepted, ApplicationStatus::Interview]
        .into_iter()
        .enumerate()
    {
        let (recruit, _) = fx.recruit(&format!("settled{n}@mail.test"));
        let application = fx
            .api
            .applications
            .create(&recruit, &ApplicationDraft { job_offer_id: offer.id })
            .expect("applied");
        fx.api
            .applications
            .update_status(&main, application.id, status)
            .expect("status set");
        settled.push((application.id, status));
    }

    let (bystander, _) = fx.recruit("bystander@mail.test");
    let unrelated = fx
        .api
        .applications
        .create(&bystander, &ApplicationDraft { job_offer_id: other_offer.id })
        .expect("applied");

    let entries_before = fx.activity().len();
    let removal = fx.api.job_offers.delete(&main, offer.id).expect("deleted");

    assert_eq!(removal.rejected_applications, pending);
    assert_eq!(fx.activity().len(), entries_before + pending.len() + 1);
    assert_eq!(fx.activity_count("APPLICATION_REJECTED"), pending.len());
    assert_eq!(fx.activity_count("JOB_OFFER_DELETED"), 1);

    let applications = fx
        .store
        .read(|unit| unit.applications().map_err(ServiceError::from))
        .expect("applications");
    for application in &applications {
        if pending.contains(&application.id) {
            assert_eq!(application.status, ApplicationStatus::Rejected);
        } else if let Some((_, status)) = settled.iter().find(|(id, _)| *id == application.id) {
            assert_eq!(application.status, *status);
        } else {
            assert_eq!(application.id, unrelated.id);
            assert_eq!(application.status, ApplicationStatus::Pending);
        }
    }

    assert_not_found(fx.api.job_offers.get(&main, offer.id));
}

#[test]
fn rejections_are_attributed_to_the_applicants() {
    let fx = fixture();
    let (main, _) = fx.main_recruiter("main@acme.test", "Acme");
    let offer = fx.offer(&main, "Engineer");
    let (recruit, _) = fx.recruit("x@mail.test");
    fx.api
        .applications
        .create(&recruit, &ApplicationDraft { job_offer_id: offer.id })
        .expect("applied");

    fx.api.job_offers.delete(&main, offer.id).expect("deleted");

    let activity = fx.activity();
    let rejected = activity
        .iter()
        .find(|entry| entry.action == "APPLICATION_REJECTED")
        .expect("rejection logged");
    assert_eq!(rejected.user_id, recruit.user_id);
    let deleted = activity
        .iter()
        .find(|entry| entry.action == "JOB_OFFER_DELETED")
        .expect("deletion logged");
    assert_eq!(deleted.user_id, main.user_id);
}

#[test]
fn update_applies_partial_changes_and_resolves_experience() {
    let fx = fixture();
    let (main, _) = fx.main_recruiter("main@acme.test", "Acme");
    let offer = fx.offer(&main, "Engineer");

    let updated = fx
        .api
        .job_offers
        .update(
            &main,
            offer.id,
            &JobOfferUpdate {
                location: Some("Remote".to_string()),
                experience_id: Some(3),
                ..JobOfferUpdate::default()
            },
        )
        .expect("updated");
    assert_eq!(updated.title, "Engineer");
    assert_eq!(updated.location, "Remote");
    assert_eq!(updated.experience, "5+ years");

    let out_of_range = JobOfferUpdate {
        experience_id: Some(4),
        ..JobOfferUpdate::default()
    };
    assert!(matches!(
        fx.api.job_offers.update(&main, offer.id, &out_of_range),
        Err(ServiceError::Validation(_))
    ));
    assert_eq!(fx.activity_count("JOB_OFFER_UPDATED"), 1);
}

#[test]
fn create_rejects_unknown_experience_bucket() {
    let fx = fixture();
    let (main, _) = fx.main_recruiter("main@acme.test", "Acme");
    let mut draft = offer_draft("Engineer");
    draft.experience_id = 9;
    assert!(matches!(
        fx.api.job_offers.create(&main, &draft),
        Err(ServiceError::Validation(_))
    ));
}

#[test]
fn company_listing_only_shows_own_offers() {
    let fx = fixture();
    let (acme, _) = fx.main_recruiter("main@acme.test", "Acme");
    let (globex, _) = fx.main_recruiter("main@globex.test", "Globex");
    fx.offer(&acme, "Engineer");
    fx.offer(&acme, "Designer");
    fx.offer(&globex, "Analyst");

    let titles: Vec<_> = fx
        .api
        .job_offers
        .list_for_company(&acme)
        .expect("listing")
        .into_iter()
        .map(|offer| offer.title)
        .collect();
    assert_eq!(titles, vec!["Engineer", "Designer"]);
}

#[test]
fn search_requires_a_filter() {
    let fx = fixture();
    let (main, _) = fx.main_recruiter("main@acme.test", "Acme");
    fx.offer(&main, "Engineer");

    assert!(matches!(
        fx.api.job_offers.search(&JobOfferFilter::default()),
        Err(ServiceError::FilterRequired)
    ));
    let blank = JobOfferFilter {
        title: Some("   ".to_string()),
        page: Some(1),
        ..JobOfferFilter::default()
    };
    assert!(matches!(
        fx.api.job_offers.search(&blank),
        Err(ServiceError::FilterRequired)
    ));

    let by_company = JobOfferFilter {
        company: Some("acme".to_string()),
        ..JobOfferFilter::default()
    };
    let hits = fx.api.job_offers.search(&by_company).expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].company_name, "Acme");
}

#[test]
fn sysadmins_do_not_pass_the_recruiter_gate() {
    let fx = fixture();
    let admin = fx.admin();
    assert_eq!(admin.role, Role::Sysadmin);
    assert_forbidden(fx.api.job_offers.create(&admin, &offer_draft("Engineer")));
}
