use crate::config::Config;
use crate::variants::split_profiles;
use anyhow::Result;
use std::io::{BufWriter, Write};

pub fn run(config: &Config, vcf_file: String, chip: bool) -> Result<()> {
    let imported = super::import_samples(config, &vcf_file, chip)?;

    let stdout = std::io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    writeln!(writer, "SampleID\tRange\tHaplogroup\tPolymorphisms")?;
    for sample in imported.samples.values() {
        let profiles = split_profiles(sample);
        writeln!(writer, "{}", profiles.major)?;
        writeln!(writer, "{}", profiles.minor)?;
    }
    writer.flush()?;

    Ok(())
}
