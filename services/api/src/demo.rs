use crate::infra::{parse_subject, InMemoryFileStore, InMemoryNoteRepository};
use clap::Args;
use nexus_notes::error::AppError;
use nexus_notes::workflows::admissions::{AdmissionSession, ScoreBreakdown};
use nexus_notes::workflows::catalog::{
    Category, FacetCandidates, FacetSelection, Note, NoteCatalogService, NoteCsvImporter,
    NoteDraft, NoteQuery,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEMO_USER: &str = "demo-student";

const SAMPLE_NOTES: &str = "\
Id,Title,Content,Author,Category,Tags,University,Faculty,Module,Verified,Created At,Updated At
1,Linear Algebra Summary,Vector spaces and eigenvalues,thandi,Mathematics,exam;linear,University of Cape Town,Science,MAM1000,true,2025-02-03,2025-03-01T08:00:00Z
2,Circuit Analysis,Kirchhoff laws and Thevenin equivalents,sipho,Science,circuits,University of the Witwatersrand,Engineering,ELEN2000,false,2025-02-10,2025-02-28T10:30:00Z
3,Data Structures,Trees graphs and hashing,aisha,Computer Science,algorithms,University of Cape Town,Science,CSC2001,true,2025-01-20,2025-02-20T09:00:00Z
4,Microeconomics,Supply demand and elasticity,liam,Business,,Stellenbosch University,Economic and Management Sciences,ECO1110,false,2025-02-01,2025-02-15T12:00:00Z
5,Thermodynamics,Laws of thermodynamics and cycles,sipho,Science,,University of the Witwatersrand,Engineering,MECN2011,false,2025-02-11,2025-02-11T16:45:00Z
";

#[derive(Args, Debug, Default)]
pub(crate) struct ApsArgs {
    /// Subject and mark as NAME=MARK; repeat for every subject. Defaults to the placeholder subjects.
    #[arg(long = "subject", value_parser = parse_subject)]
    pub(crate) subjects: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub(crate) struct FacetsArgs {
    /// Note CSV export to derive suggestions from
    #[arg(long)]
    pub(crate) notes_csv: PathBuf,
    /// Selected university
    #[arg(long)]
    pub(crate) university: Option<String>,
    /// Selected faculty
    #[arg(long)]
    pub(crate) faculty: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional note CSV export used instead of the built-in sample catalog
    #[arg(long)]
    pub(crate) notes_csv: Option<PathBuf>,
    /// Optional file to attach to the demo note
    #[arg(long)]
    pub(crate) attach: Option<PathBuf>,
}

pub(crate) fn run_aps(args: ApsArgs) -> Result<(), AppError> {
    let session = if args.subjects.is_empty() {
        AdmissionSession::new()
    } else {
        AdmissionSession::with_entries(args.subjects)
    };

    render_breakdown(&session.breakdown());
    match session.consultation_marks() {
        Ok(_) => println!("Ready for career consultation."),
        Err(err) => println!("Not ready for consultation: {err}"),
    }
    Ok(())
}

pub(crate) fn run_facets(args: FacetsArgs) -> Result<(), AppError> {
    let notes = NoteCsvImporter::from_path(&args.notes_csv)?;
    let selection = FacetSelection::new(args.university.as_deref(), args.faculty.as_deref(), None);

    println!("{} notes loaded from {}", notes.len(), args.notes_csv.display());
    render_facets(&FacetCandidates::derive(&notes, &selection));
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { notes_csv, attach } = args;

    let notes = load_notes(notes_csv.as_deref())?;
    println!("Note catalog demo ({} notes)", notes.len());

    let repository = Arc::new(InMemoryNoteRepository::seeded(notes));
    let files = Arc::new(InMemoryFileStore::default());
    let service = NoteCatalogService::new(repository, files.clone());

    let mut selection = FacetSelection::default();
    let facets = service.facets(&selection).await;
    selection.university = facets.universities.first().cloned();
    let narrowed = service.facets(&selection).await;
    selection.faculty = narrowed.faculties.first().cloned();
    let narrowed = service.facets(&selection).await;
    println!(
        "\nFacet suggestions for university={} faculty={}",
        selection.university.as_deref().unwrap_or("-"),
        selection.faculty.as_deref().unwrap_or("-")
    );
    render_facets(&narrowed);

    let query = NoteQuery {
        university: selection.university.clone(),
        faculty: selection.faculty.clone(),
        ..NoteQuery::default()
    };
    println!("\nMatching notes:");
    for note in service.search(&query).await {
        println!("  - [{}] {} ({})", note.module, note.title, verified_label(&note));
    }

    let mut draft = NoteDraft {
        id: Some("temp-demo".to_string()),
        title: "Exam Prep Checklist".to_string(),
        author: DEMO_USER.to_string(),
        category: Category::General,
        university: selection.university.clone().unwrap_or_default(),
        faculty: selection.faculty.clone().unwrap_or_default(),
        module: narrowed.modules.first().cloned().unwrap_or_default(),
        ..NoteDraft::default()
    };

    if let Some(path) = attach {
        let bytes = std::fs::read(&path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());
        let content_type = mime_guess::from_path(&path).first_or_octet_stream();
        match service
            .upload(&file_name, bytes, content_type.essence_str())
            .await
        {
            Ok(upload) => {
                draft.attach_file(&upload);
                println!("\nUploaded {} -> {}", upload.name, upload.url);
            }
            Err(err) => println!("\nUpload rejected: {err}"),
        }
    }

    println!("\nSaving a draft as {DEMO_USER}");
    match service.save(draft, DEMO_USER).await {
        Ok(outcome) => println!(
            "- {} [{}] {}",
            outcome.note.id, outcome.note.title, outcome.message
        ),
        Err(err) => println!("- Save failed: {err}"),
    }
    for object in files.objects() {
        println!(
            "  stored object {} ({} bytes, {})",
            object.path, object.size, object.content_type
        );
    }

    let stats = service.stats(Some(DEMO_USER)).await;
    println!(
        "\nCatalog stats: {} notes | {} verified ({}%) | {} by {DEMO_USER}",
        stats.total_notes,
        stats.verified_notes,
        stats.verification_rate,
        stats.contributions.unwrap_or(0)
    );

    let profile = service.profile("sipho").await;
    println!(
        "Profile sipho: {} notes | {} verified | {} institutions",
        profile.stats.total, profile.stats.verified, profile.stats.institutions
    );
    for note in &profile.notes {
        println!("  - {} ({})", note.title, note.module);
    }

    println!("\nAPS calculator demo");
    let session = AdmissionSession::with_entries([
        ("English", "72"),
        ("Mathematics", "81"),
        ("Life Orientation", "75"),
        ("Physical Sciences", "64"),
    ]);
    render_breakdown(&session.breakdown());

    Ok(())
}

fn load_notes(path: Option<&Path>) -> Result<Vec<Note>, AppError> {
    let notes = match path {
        Some(path) => NoteCsvImporter::from_path(path)?,
        None => NoteCsvImporter::from_reader(Cursor::new(SAMPLE_NOTES))?,
    };
    Ok(notes)
}

fn verified_label(note: &Note) -> &'static str {
    if note.is_verified {
        "verified"
    } else {
        "unverified"
    }
}

fn render_facets(facets: &FacetCandidates) {
    println!("Universities: {}", facets.universities.join(", "));
    println!("Faculties:    {}", facets.faculties.join(", "));
    println!("Modules:      {}", facets.modules.join(", "));
}

fn render_breakdown(breakdown: &ScoreBreakdown) {
    for subject in &breakdown.subjects {
        println!(
            "  - {:<20} {:>4}% -> {} points",
            subject.subject, subject.mark, subject.points
        );
    }
    println!("Total APS: {}", breakdown.total);
}
