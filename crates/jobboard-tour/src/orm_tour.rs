//! Session walkthrough over users, jobs, companies, and their junction table.
//!
//! Each block of work runs in its own [`Session`] and is committed before
//! the next one starts, so every printed result reflects committed state.

use jobboard_db::{ConstraintKind, OnDelete, PostgresPool, Session};
use jobboard_types::{Company, Job};
use tracing::{info, warn};

use crate::error::TourError;
use crate::report;

/// Job titles inserted by the walkthrough.
pub const JOB_NAMES: [&str; 3] = ["CEO", "Programmer", "Designer"];

/// Company names inserted by the walkthrough.
pub const COMPANY_NAMES: [&str; 3] = ["Digital", "Analog", "Quantum"];

/// Which company offers which job: six junction rows.
pub const PAIRINGS: [(&str, &str); 6] = [
    ("Digital", "CEO"),
    ("Digital", "Programmer"),
    ("Analog", "CEO"),
    ("Analog", "Designer"),
    ("Quantum", "Programmer"),
    ("Quantum", "Designer"),
];

/// Run the full session walkthrough.
///
/// Job and company names are unique, so the walkthrough expects to seed
/// into empty tables. With `drop_after` off, a second run against the same
/// schema stops at the seed step with a unique violation.
///
/// # Errors
///
/// Returns [`TourError`] if any statement fails or a row inserted earlier
/// in the walkthrough cannot be found again.
pub async fn run(pool: &PostgresPool, drop_after: bool) -> Result<(), TourError> {
    info!("Session walkthrough starting");
    let schema = pool.schema();

    schema.create_all(pool.pool()).await?;
    print_counts(pool, "Row counts before seeding").await?;

    // Jobs, companies, and the six pairings between them.
    let mut session = pool.session().await?;
    let jobs = session.jobs().insert_many(&JOB_NAMES).await?;
    let companies = session.companies().insert_many(&COMPANY_NAMES).await?;
    let mut pairs = Vec::with_capacity(PAIRINGS.len());
    for (company_name, job_name) in PAIRINGS {
        let company = by_name(&companies, company_name, |c: &Company| &c.name)?;
        let job = by_name(&jobs, job_name, |j: &Job| &j.name)?;
        pairs.push((company.id, job.id));
    }
    let links = session.links().link_many(&pairs).await?;
    session.commit().await?;
    info!(
        jobs = jobs.len(),
        companies = companies.len(),
        links = links.len(),
        "Seeded jobs and companies"
    );

    // Walk the many-to-many relationship from the company side.
    let mut session = pool.session().await?;
    for company in &companies {
        let offered = session.companies().jobs_of(company.id).await?;
        println!(
            "{}",
            report::names(&company.name, offered.iter().map(|j| j.name.as_str()))
        );
    }
    session.rollback().await?;

    // Users.
    let mut session = pool.session().await?;
    let ceo = require_job(&mut session, "CEO").await?;
    let programmer = require_job(&mut session, "Programmer").await?;
    let designer = require_job(&mut session, "Designer").await?;
    let spongebob = session.users().insert("spongebob", Some(ceo.id)).await?;
    let patrick = session.users().insert("patrick", None).await?;
    session.users().insert("squidward", Some(designer.id)).await?;
    session.commit().await?;
    print_users(pool, "Users").await?;

    // Reassign a job, commit, then reload in a fresh session.
    let mut session = pool.session().await?;
    session.users().assign_job(spongebob.id, Some(programmer.id)).await?;
    session.commit().await?;
    let mut session = pool.session().await?;
    let reloaded = session.users().require(spongebob.id).await?;
    let job = session.users().job_of(spongebob.id).await?;
    session.rollback().await?;
    println!(
        "Reloaded {} now works as {}",
        reloaded.username,
        job.as_ref().map_or("nobody", |j| j.name.as_str())
    );

    // Rename a user.
    let mut session = pool.session().await?;
    session.users().rename(patrick.id, "Patrick Star").await?;
    session.commit().await?;
    print_users(pool, "After rename").await?;

    // Delete a job that junction rows still reference.
    let mut session = pool.session().await?;
    let outcome = session.jobs().delete(ceo.id).await;
    match outcome {
        Ok(deleted) => {
            session.commit().await?;
            println!(
                "Deleted CEO: {deleted}; junction rows {}",
                junction_outcome(schema.link_on_delete())
            );
        }
        Err(err) if err.constraint_kind() == Some(ConstraintKind::ForeignKey) => {
            session.rollback().await?;
            warn!(error = %err, "Job delete refused");
            println!("Refused to delete CEO: {err}");
        }
        Err(err) => return Err(err.into()),
    }
    print_counts(pool, "After job delete").await?;

    if drop_after {
        schema.drop_all(pool.pool()).await?;
        let remaining = schema.existing_tables(pool.pool()).await?;
        println!("{}", report::names("Tables left after drop", remaining));
    }

    info!("Session walkthrough finished");
    Ok(())
}

/// What happened to a deleted job's junction rows, given that the delete
/// went through.
const fn junction_outcome(on_delete: OnDelete) -> &'static str {
    match on_delete {
        OnDelete::Cascade => "cascaded",
        OnDelete::Restrict => "referenced none",
    }
}

async fn print_counts(pool: &PostgresPool, label: &str) -> Result<(), TourError> {
    let counts = pool.schema().row_counts(pool.pool()).await?;
    let rendered: Vec<String> = counts
        .iter()
        .map(|c| format!("{}={}", c.table, c.rows))
        .collect();
    println!("{label}: {}", rendered.join(" "));
    Ok(())
}

async fn print_users(pool: &PostgresPool, label: &str) -> Result<(), TourError> {
    let mut session = pool.session().await?;
    let users = session.users().list().await?;
    session.rollback().await?;
    println!("{}", report::rows(label, &users));
    Ok(())
}

async fn require_job(session: &mut Session, name: &str) -> Result<Job, TourError> {
    session
        .jobs()
        .find_by_name(name)
        .await?
        .ok_or_else(|| TourError::Missing {
            what: format!("job {name}"),
        })
}

fn by_name<'a, T, F>(items: &'a [T], name: &str, key: F) -> Result<&'a T, TourError>
where
    F: Fn(&T) -> &String,
{
    items
        .iter()
        .find(|item| key(item) == name)
        .ok_or_else(|| TourError::Missing {
            what: name.to_owned(),
        })
}
