use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use log::warn;

use crate::error::Error;

/// Base64 (standard alphabet, padded) encoding of the endorsement key.
#[must_use]
pub fn encode_endorsement_key(endorsement_key: &[u8]) -> String {
    STANDARD.encode(endorsement_key)
}

/// Destination opened for writing, existing content still in place.
struct OutputFile {
    path: PathBuf,
    file: File,
    created: bool,
}

impl OutputFile {
    fn open(path: &Path) -> Result<Self, Error> {
        let opened = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => Ok((file, true)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => OpenOptions::new()
                .write(true)
                .create(true)
                .open(path)
                .map(|file| (file, false)),
            Err(e) => Err(e),
        };
        let (file, created) = opened.map_err(|source| Error::FileOpenError {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(OutputFile {
            path: path.to_path_buf(),
            file,
            created,
        })
    }

    fn write(&mut self, content: &str) -> Result<(), Error> {
        overwrite(&mut self.file, content.as_bytes()).map_err(|source| Error::FileWriteError {
            path: self.path.clone(),
            source,
        })
    }

    /// Remove the file if it did not exist before it was opened.
    fn discard(self) {
        if self.created {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("failed to remove {:?}: {e}", self.path);
            }
        }
    }
}

fn overwrite(file: &mut File, content: &[u8]) -> io::Result<()> {
    // devices and pipes cannot be truncated
    if file.metadata()?.is_file() {
        file.set_len(0)?;
    }
    file.write_all(content)?;
    file.flush()
}

fn open_output_files(ek_path: &Path, regid_path: &Path) -> Result<(OutputFile, OutputFile), Error> {
    let ek_file = OutputFile::open(ek_path)?;
    match OutputFile::open(regid_path) {
        Ok(regid_file) => Ok((ek_file, regid_file)),
        Err(e) => {
            ek_file.discard();
            Err(e)
        }
    }
}

/// Write the encoded endorsement key and the registration id to their files.
///
/// Both destinations are opened before either is written: when one cannot be
/// opened, neither is modified. Existing files are overwritten in place, so
/// symlinks are followed and permissions kept. Contents are written verbatim,
/// without trailing newline.
pub fn write_registration_files(
    ek_path: &Path,
    encoded_ek: &str,
    regid_path: &Path,
    registration_id: &str,
) -> Result<(), Error> {
    let (mut ek_file, mut regid_file) = open_output_files(ek_path, regid_path)
        .inspect_err(|_| println!("I/O ERROR: Failed to open files for writing."))?;

    println!("\n\nEndorsement Key: {encoded_ek}");
    println!("\nRegistration ID: {registration_id}\n");

    if let Err(e) = ek_file
        .write(encoded_ek)
        .and_then(|()| regid_file.write(registration_id))
    {
        println!("I/O ERROR: Failed to write output files.");
        ek_file.discard();
        regid_file.discard();
        return Err(e);
    }

    Ok(())
}
