mod common;
mod job_offers;
