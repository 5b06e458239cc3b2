use haplocheck_tools::variants::{split_profiles, VariantKind, VcfImporter};
use haplocheck_tools::HaploError;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

const HEADER: &str = "##fileformat=VCFv4.2\n\
##contig=<ID=chrM,length=16569>\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">\n";

fn write_vcf(af_type: &str, body: &str) -> tempfile::NamedTempFile {
    let number = if af_type == "String" { "." } else { "A" };
    let mut file = tempfile::Builder::new().suffix(".vcf").tempfile().expect("create temp VCF");
    write!(
        file,
        "{}##FORMAT=<ID=AF,Number={},Type={},Description=\"Allele frequency\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tFORMAT\tS1\tS2\n{}",
        HEADER, number, af_type, body
    )
    .expect("write temp VCF");
    file.flush().expect("flush temp VCF");
    file
}

#[test]
fn imports_all_variant_shapes() {
    let vcf = write_vcf(
        "Float",
        "chrM\t73\t.\tA\tG\t.\tPASS\tGT:DP:AF\t1:50:1.0\t0:40:.\n\
chrM\t200\t.\tACA\tAC\t.\tPASS\tGT:DP\t1/1:30\t0/0:30\n\
chrM\t300\t.\tC\tCAT\t.\tPASS\tGT\t1\t0\n\
chrM\t16093\t.\tT\tC\t.\tPASS\tGT:DP:AF\t0/1:100:0.3\t1/1:90:.\n",
    );

    let imported = VcfImporter::default().load(vcf.path()).expect("import VCF");
    assert!(imported.rejected.is_empty());
    assert_eq!(imported.samples.len(), 2);

    let s1 = &imported.samples["S1"];
    let kinds: Vec<(u32, VariantKind)> = s1.variants().map(|v| (v.position, v.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            (73, VariantKind::Substitution),
            (202, VariantKind::Deletion),
            (300, VariantKind::Insertion),
            (16093, VariantKind::Heteroplasmy),
        ]
    );
    assert_eq!(s1.variant(73).unwrap().coverage, Some(50));
    assert_eq!(s1.variant(300).unwrap().inserted_sequence(), Some("AT"));

    let het = s1.variant(16093).unwrap();
    let major = het.major().unwrap();
    assert_eq!(major.allele, 'T');
    assert!((major.level - 0.7).abs() < 1e-6);
    assert_eq!(het.minor().unwrap().allele, 'C');
    assert_eq!(het.coverage, Some(100));

    let s2 = &imported.samples["S2"];
    assert_eq!(s2.len(), 1);
    assert_eq!(s2.variant(16093).unwrap().called_base(), Some('C'));
    assert_eq!(s2.stats().substitutions, 1);

    let profiles = split_profiles(s1);
    assert_eq!(profiles.major.id(), "S1_maj");
    assert_eq!(profiles.minor.profile().polymorphisms.last().unwrap().to_string(), "16093C");
}

#[test]
fn malformed_frequency_rejects_only_that_sample() {
    let vcf = write_vcf(
        "String",
        "chrM\t73\t.\tA\tG\t.\tPASS\tGT:AF\t1:1.0\t1:1.0\n\
chrM\t152\t.\tT\tC\t.\tPASS\tGT:AF\t0/1:abc\t1/1:1.0\n\
chrM\t263\t.\tA\tG\t.\tPASS\tGT:AF\t1:1.0\t1:1.0\n",
    );

    let imported = VcfImporter::default().load(vcf.path()).expect("import VCF");
    assert_eq!(imported.samples.keys().collect::<Vec<_>>(), vec!["S2"]);
    assert_eq!(imported.samples["S2"].len(), 3);

    assert_eq!(imported.rejected.len(), 1);
    let rejected = &imported.rejected[0];
    assert_eq!(rejected.sample_id(), Some("S1"));
    assert!(matches!(rejected, HaploError::MalformedSample { .. }));
}

#[test]
fn chip_mode_covers_record_positions_only() {
    let vcf = write_vcf(
        "Float",
        "chrM\t73\t.\tA\tG\t.\tPASS\tGT\t1\t0\n\
chrM\t263\t.\tA\tG\t.\tPASS\tGT\t1\t1\n",
    );

    let imported = VcfImporter::default().chip(true).load(vcf.path()).expect("import VCF");
    let range = imported.samples["S1"].range();
    assert_eq!(range.to_string(), "73;263;");
    assert!(!range.contains(100));
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn out_of_range_position_is_reported_once_per_record() {
    let vcf = write_vcf(
        "Float",
        "chrM\t73\t.\tA\tG\t.\tPASS\tGT\t1\t1\n\
chrM\t400\t.\tT\tC\t.\tPASS\tGT\t1\t1\n",
    );
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let imported = tracing::subscriber::with_default(subscriber, || VcfImporter::new(300).load(vcf.path()))
        .expect("import VCF");

    assert_eq!(imported.samples["S1"].len(), 2);
    assert_eq!(imported.samples["S2"].len(), 2);
    assert_eq!(logs.text().matches("Position 400 outside").count(), 1);
}
