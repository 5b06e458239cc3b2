use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print major and minor haplotype profiles for every sample in a VCF
    Split {
        /// Input VCF/BCF file (rCRS coordinates)
        vcf_file: String,
        /// Treat input as genotyping array data (only listed positions are covered)
        #[arg(long)]
        chip: bool,
    },

    /// Print per-sample variant counts and sums as JSON
    Summary {
        /// Input VCF/BCF file (rCRS coordinates)
        vcf_file: String,
        /// Treat input as genotyping array data (only listed positions are covered)
        #[arg(long)]
        chip: bool,
    },
}
