use anyhow::{Context, bail};
use clap::Parser;
use tumor_scan::logging::init_logging;
use tumor_scan::{
    Args, Command, OnnxScorer, PatientStore, Processor, Session, StaticCredentials, TumorDetector,
    Upload,
};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut session = Session::new();
    let auth = StaticCredentials::new(&args.admin_user, &args.admin_password);
    if !session.login(&auth, &args.username, &args.password) {
        bail!("login failed: pass --username and --password (or TUMOR_SCAN_USERNAME / TUMOR_SCAN_PASSWORD)");
    }

    let store = PatientStore::new(&args.store);

    match &args.command {
        Command::Tutorial => {
            println!("{}", tumor_scan::show_tutorial(&session)?);
        }
        Command::Check { name, image } => {
            let upload = Upload::from_path(image)
                .with_context(|| format!("reading upload {}", image.display()))?;
            let scorer = OnnxScorer::shared(&args.model, args.cuda)?;
            let detector = TumorDetector::new(Processor::default(), scorer);

            let (record, _) = tumor_scan::check_tumor(&session, &store, &detector, name, &upload)
                .with_context(|| format!("checking {}", upload.file_name()))?;
            println!("{}: {} ({:.2}%)", record.name, record.result, record.confidence);
            println!("Saved to {}", store.path().display());
        }
        Command::History => {
            println!("{}", tumor_scan::show_history(&session, &store)?.render());
        }
        Command::Delete { name, index } => {
            if let Some(name) = name {
                let removed = tumor_scan::delete_patient(&session, &store, name)?;
                println!("Deleted {removed} record(s) named '{name}'.");
            } else if let Some(number) = index {
                let removed = tumor_scan::delete_row(&session, &store, *number)?;
                println!("Deleted row {number} ({}).", removed.name);
            }
            println!();
            println!("{}", tumor_scan::show_history(&session, &store)?.render());
        }
    }

    session.logout();
    Ok(())
}
