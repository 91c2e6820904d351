//! Create command implementation.

use crate::cli::CreateArgs;
use crate::error::convert_pack_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use repropack_core::ArchiveCreator;

pub fn execute(
    args: &CreateArgs,
    formatter: &dyn OutputFormatter,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let mut creator = ArchiveCreator::new(&args.source_dir, &args.output)
        .symlinks(args.symlinks.into())
        .preserve_permissions(!args.no_preserve_permissions);

    if let Some(prefix) = &args.prefix {
        creator = creator.prefix(prefix);
    }
    if let Some(level) = args.compression_level {
        creator = creator.compression_level(level);
    }
    if let Some(format) = args.format {
        creator = creator.format(format.into());
    }

    let temp_path = creator.request().temp_path();

    let result = if !quiet && !json && CliProgress::should_show() {
        let mut progress = CliProgress::new("Packing");
        creator.create_with_progress(&mut progress)
    } else {
        creator.create()
    };

    let report = result.map_err(|e| convert_pack_error(e, &args.output, &temp_path))?;

    formatter.format_creation_result(&args.output, &report)
}
