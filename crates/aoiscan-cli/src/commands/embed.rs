//! Embed command implementation

use crate::cli::EmbedArgs;
use crate::output::OutputWriter;
use crate::output_types::EmbedOutput;
use anyhow::Result;
use aoiscan_core::embed::iframe_embed_code;

pub fn execute(args: EmbedArgs, output: &OutputWriter) -> Result<()> {
    let html = iframe_embed_code(&args.url, args.width.as_deref(), args.height.as_deref());

    if output.is_json() {
        output.result(EmbedOutput { html })
    } else {
        println!("{}", html);
        Ok(())
    }
}
