//! Sequence and motif artifact persistence
//!
//! Sequences are read from plain-text files (one sequence per file, id =
//! file stem) or from FASTA/FASTQ files (id = record id), with transparent
//! gzip decompression for the latter. Motif collections are stored as one
//! pretty-printed JSON document per sequence.

use crate::constants::ANALYSIS_SUFFIX;
use crate::motif::{MotifCollection, MotifRecord};
use crate::sequence::SymbolSequence;
use anyhow::{Context, Result};
use needletail::parse_fastx_file;
use std::fs;
use std::path::{Path, PathBuf};

const FASTX_EXTENSIONS: &[&str] = &[".fa", ".fasta", ".fq", ".fastq"];

/// Check whether a path names a FASTA/FASTQ file (optionally gzipped)
pub fn is_fastx_path(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(name);
    FASTX_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

fn is_text_path(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("txt")
}

/// List regular files in a folder, sorted by file name
fn sorted_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(folder)
        .with_context(|| format!("Failed to read folder: {}", folder.display()))?
    {
        let path = entry
            .with_context(|| format!("Failed to list folder: {}", folder.display()))?
            .path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("Invalid file name: {}", path.display()))
}

/// Read a plain-text sequence file; the id is the file stem
pub fn read_text_sequence(path: &Path) -> Result<SymbolSequence> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sequence file: {}", path.display()))?;
    let id = file_stem(path)?;
    SymbolSequence::from_text(id, &text)
        .with_context(|| format!("Invalid sequence in {}", path.display()))
}

/// Read every record of a FASTA/FASTQ file (may be gzipped)
///
/// # Errors
/// Returns error if:
/// - File cannot be opened
/// - File format is invalid
/// - A sequence contains non-DNA characters
pub fn read_fastx_sequences(path: &Path) -> Result<Vec<SymbolSequence>> {
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("Failed to open sequence file: {}", path.display()))?;

    let mut sequences = Vec::new();
    while let Some(record) = reader.next() {
        let record = record
            .with_context(|| format!("Failed to parse sequence record in {}", path.display()))?;
        let id = String::from_utf8_lossy(record.id()).into_owned();
        let sequence = SymbolSequence::new(id, &record.seq())
            .with_context(|| format!("Invalid DNA sequence in {}", path.display()))?;
        sequences.push(sequence);
    }

    Ok(sequences)
}

/// Read all sequences from a folder
///
/// Loads `.txt` files and FASTA/FASTQ files in file-name order; other files
/// are ignored.
pub fn read_sequence_folder(folder: &Path) -> Result<Vec<SymbolSequence>> {
    let mut sequences = Vec::new();
    for path in sorted_files(folder)? {
        if is_text_path(&path) {
            sequences.push(read_text_sequence(&path)?);
        } else if is_fastx_path(&path) {
            sequences.extend(read_fastx_sequences(&path)?);
        }
    }
    Ok(sequences)
}

/// Read sequences from a file or a folder
pub fn read_sequences(path: &Path) -> Result<Vec<SymbolSequence>> {
    if path.is_dir() {
        read_sequence_folder(path)
    } else if is_fastx_path(path) {
        read_fastx_sequences(path)
    } else {
        Ok(vec![read_text_sequence(path)?])
    }
}

/// Write each sequence as `<id>.txt` into a folder, creating it if needed
pub fn write_sequence_folder(folder: &Path, sequences: &[SymbolSequence]) -> Result<()> {
    fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create folder: {}", folder.display()))?;
    for sequence in sequences {
        let path = folder.join(format!("{}.txt", sequence.id()));
        fs::write(&path, sequence.as_bytes())
            .with_context(|| format!("Failed to write sequence file: {}", path.display()))?;
    }
    Ok(())
}

/// Path of the motif collection file for a sequence id
pub fn analysis_path(folder: &Path, sequence_id: &str) -> PathBuf {
    folder.join(format!("{}{}", sequence_id, ANALYSIS_SUFFIX))
}

/// Write one motif collection as pretty JSON
pub fn write_collection(path: &Path, collection: &MotifCollection) -> Result<()> {
    let json = serde_json::to_string_pretty(collection)
        .context("Failed to serialize motif collection")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write motif collection: {}", path.display()))
}

/// Read one motif collection
pub fn read_collection(path: &Path) -> Result<MotifCollection> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read motif collection: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse motif collection: {}", path.display()))
}

/// Write collections as `<id>_analysis.json` into a folder, creating it if needed
pub fn write_collection_folder(folder: &Path, collections: &[MotifCollection]) -> Result<()> {
    fs::create_dir_all(folder)
        .with_context(|| format!("Failed to create folder: {}", folder.display()))?;
    for collection in collections {
        write_collection(&analysis_path(folder, &collection.sequence_id), collection)?;
    }
    Ok(())
}

/// Read every `*_analysis.json` collection in a folder, in file-name order
pub fn read_collection_folder(folder: &Path) -> Result<Vec<MotifCollection>> {
    let mut collections = Vec::new();
    for path in sorted_files(folder)? {
        let is_analysis = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(ANALYSIS_SUFFIX));
        if is_analysis {
            collections.push(read_collection(&path)?);
        }
    }
    Ok(collections)
}

/// Flatten collections into one record stream, preserving order
pub fn pool_records(collections: Vec<MotifCollection>) -> Vec<MotifRecord> {
    collections.into_iter().flat_map(|c| c.motifs).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codon::CodonSet;
    use crate::dissect::dissect_sequence;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_is_fastx_path() {
        assert!(is_fastx_path(Path::new("reads.fa")));
        assert!(is_fastx_path(Path::new("reads.fastq.gz")));
        assert!(!is_fastx_path(Path::new("000.txt")));
        assert!(!is_fastx_path(Path::new("reads.gz")));
    }

    #[test]
    fn test_parse_fasta_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, ">seq1")?;
        writeln!(temp_file, "ACGT")?;
        writeln!(temp_file, ">seq2")?;
        writeln!(temp_file, "tgca")?;
        temp_file.flush()?;

        let sequences = read_fastx_sequences(temp_file.path())?;
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].id(), "seq1");
        assert_eq!(sequences[0].as_str(), "ACGT");
        assert_eq!(sequences[1].as_str(), "TGCA");

        Ok(())
    }

    #[test]
    fn test_fasta_invalid_base() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, ">bad")?;
        writeln!(temp_file, "ACGTN")?;
        temp_file.flush()?;

        assert!(read_fastx_sequences(temp_file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_sequence_folder_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let sequences = vec![
            SymbolSequence::from_text("001", "ATGAAATGA")?,
            SymbolSequence::from_text("000", "CCCGGG")?,
        ];
        write_sequence_folder(dir.path(), &sequences)?;
        fs::write(dir.path().join("notes.md"), "ignored")?;

        let loaded = read_sequence_folder(dir.path())?;
        let ids: Vec<&str> = loaded.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["000", "001"]);
        assert_eq!(loaded[1].as_str(), "ATGAAATGA");
        Ok(())
    }

    #[test]
    fn test_malformed_text_sequence() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("000.txt"), "ATGXAA")?;
        let err = read_sequence_folder(dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("offset 3"));
        Ok(())
    }

    #[test]
    fn test_collection_folder_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let codons = CodonSet::default();
        let collections = vec![
            dissect_sequence(&SymbolSequence::from_text("000", "ATGAAATGA")?, &codons),
            dissect_sequence(&SymbolSequence::from_text("001", "CCCATACCCTAA")?, &codons),
        ];
        write_collection_folder(dir.path(), &collections)?;
        assert!(analysis_path(dir.path(), "000").exists());

        let loaded = read_collection_folder(dir.path())?;
        assert_eq!(loaded, collections);

        let records = pool_records(loaded);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sequence_id(), "000");
        assert_eq!(records[1].content(), "CCC");
        Ok(())
    }

    #[test]
    fn test_corrupted_collection_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = analysis_path(dir.path(), "000");
        fs::write(
            &path,
            r#"{"sequence_id":"000","motifs":[{"sequence_id":"000","content":"NN?","start_position":50,"end_position":1,"start_codon":"ATG","stop_codon":"TGA"}]}"#,
        )?;

        let err = read_collection_folder(dir.path()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to parse motif collection"));
        assert!(message.contains("Malformed motif record"));
        Ok(())
    }
}
