use std::{
    io::Write,
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};

use thiserror::Error;
use tracing::{debug, error, trace};

use crate::automaton::StructuralError;

use super::{Diagram, LayoutOptions};

/// Errors that can occur while rendering a [`Diagram`] through graphviz.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The automaton violates a structural invariant, so there is no diagram to render.
    #[error("could not build diagram: {0}")]
    Structure(#[from] StructuralError),
    /// Spawning a process or accessing a file failed.
    #[error("i/o error while rendering: {0}")]
    Io(#[from] std::io::Error),
    /// An external program reported failure.
    #[error("`{program}` exited with status {status}: {stderr}")]
    NonZeroExit {
        /// The program that was run, `dot` or the image viewer.
        program: String,
        /// Its exit status.
        status: ExitStatus,
        /// What it wrote to stderr, empty if that was not captured.
        stderr: String,
    },
}

/// Where and how a diagram is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Name of the output file without extension.
    pub filename: String,
    /// Output format understood by graphviz, e.g. `png` or `svg`. Also used as file extension.
    pub format: String,
    /// Directory in which the file is placed, the working directory if `None`.
    pub directory: Option<PathBuf>,
}

impl Export {
    /// Exports to `filename` as PNG in the working directory.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format: "png".to_string(),
            directory: None,
        }
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Places the output in `directory`.
    pub fn in_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// The path of the rendered file.
    pub fn path(&self) -> PathBuf {
        self.path_with_extension(&self.format)
    }

    /// The path of the DOT source, which is kept when cleanup is disabled.
    pub fn source_path(&self) -> PathBuf {
        self.path_with_extension("gv")
    }

    fn path_with_extension(&self, extension: &str) -> PathBuf {
        let file = format!("{}.{}", self.filename, extension);
        match &self.directory {
            Some(dir) => dir.join(file),
            None => PathBuf::from(file),
        }
    }
}

impl Diagram {
    /// Renders the diagram in the given `format` through the `dot` executable and returns the
    /// produced bytes.
    pub fn render(&self, layout: &LayoutOptions, format: &str) -> Result<Vec<u8>, RenderError> {
        let dot = self.dot_representation(layout);

        let mut command = Command::new("dot");
        command.arg(format!("-T{format}"));
        let output = pipe_through(command, dot.as_bytes())?;
        trace!("dot produced {} bytes of {format}", output.len());
        Ok(output)
    }

    /// Renders the diagram into the file described by `export` and returns its path. The DOT
    /// source is written to a temporary file that is removed afterwards, unless
    /// [`LayoutOptions::cleanup`] is disabled, in which case it is kept next to the output.
    pub fn render_to_file(
        &self,
        layout: &LayoutOptions,
        export: &Export,
    ) -> Result<PathBuf, RenderError> {
        if let Some(dir) = &export.directory {
            std::fs::create_dir_all(dir)?;
        }
        let target = export.path();
        let dot = self.dot_representation(layout);

        // the temporary file is deleted when it goes out of scope, also on errors
        let mut tempfile = None;
        let source = if layout.cleanup {
            let mut file = tempfile::NamedTempFile::new()?;
            file.write_all(dot.as_bytes())?;
            file.flush()?;
            let path = file.path().to_path_buf();
            tempfile = Some(file);
            path
        } else {
            let path = export.source_path();
            std::fs::write(&path, dot.as_bytes())?;
            path
        };

        debug!(
            "rendering {} to {}",
            source.display(),
            target.display()
        );
        let output = Command::new("dot")
            .arg(format!("-T{}", export.format))
            .arg("-o")
            .arg(&target)
            .arg(&source)
            .output()?;
        drop(tempfile);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            error!("could not render to {}, dot reported\n{}", target.display(), stderr);
            return Err(RenderError::NonZeroExit {
                program: "dot".to_string(),
                status: output.status,
                stderr,
            });
        }
        Ok(target)
    }

    /// First renders a PNG using [`Self::render()`], which is then displayed by a locally
    /// installed image viewer, see [`display_png`].
    pub fn display(&self, layout: &LayoutOptions) -> Result<(), RenderError> {
        display_png(self.render(layout, "png")?)
    }
}

/// Feeds `input` to the standard input of `command` and collects its standard output.
fn pipe_through(mut command: Command, input: &[u8]) -> Result<Vec<u8>, RenderError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // the program may exit before consuming its input, its exit status then explains the failure
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(input),
        None => Ok(()),
    };

    let output = child.wait_with_output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        error!("could not render, {program} reported\n{}", stderr);
        return Err(RenderError::NonZeroExit {
            program,
            status: output.status,
            stderr,
        });
    }
    written?;
    Ok(output.stdout)
}

/// Displays a png given as a vector of bytes by calling an image viewer.
/// On Macos, that is the Preview app, while on Linux and Windows this can be configured by
/// setting the IMAGE_VIEWER environment variable. If it is not set, then the display command
/// of ImageMagick will be used.
///
/// The image is handed to the viewer before returning, waiting for the viewer to be closed
/// happens in the background and a non-zero exit status from then on is only logged. If the
/// viewer quits before it has read the whole image, it is waited for and its status reported.
pub fn display_png(contents: Vec<u8>) -> Result<(), RenderError> {
    let (program, mut command) = if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg("-a").arg("Preview.app").arg("-f");
        ("open".to_string(), command)
    } else {
        let image_viewer = std::env::var("IMAGE_VIEWER").unwrap_or("display".to_string());
        (image_viewer.clone(), Command::new(image_viewer))
    };

    let mut child = command.stdin(Stdio::piped()).spawn()?;
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(&contents),
        None => Ok(()),
    };
    if let Err(e) = written {
        let status = child.wait()?;
        if !status.success() {
            return Err(RenderError::NonZeroExit {
                program,
                status,
                stderr: String::new(),
            });
        }
        return Err(e.into());
    }

    std::thread::spawn(move || match child.wait() {
        Ok(status) if status.success() => trace!("{program} exited with {status}"),
        Ok(status) => error!("{program} exited with {status}"),
        Err(e) => error!("could not wait for {program}: {e}"),
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{prelude::*, tests::flip_dfa};

    #[test]
    fn export_paths() {
        let export = Export::new("flip");
        assert_eq!(export.path(), PathBuf::from("flip.png"));
        let export = export.with_format("svg").in_directory("out");
        assert_eq!(export.path(), PathBuf::from("out").join("flip.svg"));
        assert_eq!(export.source_path(), PathBuf::from("out").join("flip.gv"));
    }

    #[cfg(unix)]
    #[test]
    fn piped_output_is_collected() {
        let output = pipe_through(Command::new("cat"), b"digraph DFA {}").unwrap();
        assert_eq!(output, b"digraph DFA {}");
    }

    #[cfg(unix)]
    #[test_log::test]
    fn early_exit_reports_status_and_stderr() {
        let mut command = Command::new("sh");
        command.arg("-c").arg("echo 'unknown format' >&2; exit 3");
        let input = vec![b'x'; 1 << 20];
        match pipe_through(command, &input) {
            Err(RenderError::NonZeroExit {
                program,
                status,
                stderr,
            }) => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
                assert!(stderr.contains("unknown format"));
            }
            other => panic!("expected non-zero exit, got {other:?}"),
        }
    }

    #[test_log::test]
    #[ignore]
    fn render_png() {
        let diagram = Diagram::assemble(&flip_dfa()).unwrap();
        let png = diagram.render(&LayoutOptions::default(), "png").unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test_log::test]
    #[ignore]
    fn render_svg_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export = Export::new("flip")
            .with_format("svg")
            .in_directory(dir.path().join("nested"));
        let layout = LayoutOptions {
            cleanup: false,
            ..Default::default()
        };
        let path = Diagram::assemble(&flip_dfa())
            .unwrap()
            .render_to_file(&layout, &export)
            .unwrap();
        assert!(std::fs::read_to_string(path).unwrap().contains("<svg"));
        assert!(export.source_path().exists());
    }

    #[test_log::test]
    #[ignore]
    fn display_dfa() {
        Diagram::assemble(&flip_dfa())
            .unwrap()
            .display(&LayoutOptions::default())
            .unwrap();
    }
}
