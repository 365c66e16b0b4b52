use futures::{FutureExt as _, StreamExt as _};

/// yt-dlp is asked to print the final file path behind this prefix so we can fish it out of the
/// regular progress output
pub const FINAL_PATH_PREFIX: &str = "__YTCLI_FINAL_PATH__:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// None if the process was killed by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for ExitOutcome {
    fn from(status: std::process::ExitStatus) -> Self {
        Self { code: status.code() }
    }
}

impl std::fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => f.write_str("terminated by signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit: ExitOutcome,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Whatever the process said on either stream, trimmed
    pub fn diagnostics(&self) -> String {
        format!("{}\n{}", self.stdout.trim(), self.stderr.trim()).trim().to_string()
    }
}

/// A running child whose stdout is consumed line by line. Drain `lines` before awaiting `exit`.
pub struct StreamedProcess {
    pub lines: futures::stream::BoxStream<'static, std::io::Result<String>>,
    pub exit: futures::future::BoxFuture<'static, std::io::Result<ExitOutcome>>,
}

#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs to completion with both output streams captured
    async fn output(&self, program: &std::path::Path, args: &[String])
        -> std::io::Result<ProcessOutput>;

    /// Runs to completion with stdout and stderr going straight to ours
    async fn relay(&self, program: &std::path::Path, args: &[String])
        -> std::io::Result<ExitOutcome>;

    /// Starts the process with stdout piped back as lines and stderr going straight to ours
    fn spawn_lines(&self, program: &std::path::Path, args: &[String])
        -> std::io::Result<StreamedProcess>;
}

pub struct TokioRunner;

#[async_trait::async_trait]
impl CommandRunner for TokioRunner {
    async fn output(
        &self,
        program: &std::path::Path,
        args: &[String],
    ) -> std::io::Result<ProcessOutput> {
        log::debug!("running {} {:?}", program.display(), args);
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(std::process::Stdio::null())
            .output()
            .await?;

        Ok(ProcessOutput {
            exit: output.status.into(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn relay(
        &self,
        program: &std::path::Path,
        args: &[String],
    ) -> std::io::Result<ExitOutcome> {
        log::debug!("running {} {:?}", program.display(), args);
        let status = tokio::process::Command::new(program).args(args).status().await?;
        Ok(status.into())
    }

    fn spawn_lines(
        &self,
        program: &std::path::Path,
        args: &[String],
    ) -> std::io::Result<StreamedProcess> {
        use tokio::io::AsyncBufReadExt as _;

        log::debug!("running {} {:?} with captured stdout", program.display(), args);
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            // Bailing out on a read error drops `exit` unpolled; don't leave yt-dlp running
            .kill_on_drop(true)
            .spawn()?;
        let stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "child stdout was not captured")
        })?;

        // Split on raw bytes so a stray non-UTF-8 title doesn't abort the download
        let lines = tokio_stream::wrappers::SplitStream::new(
            tokio::io::BufReader::new(stdout).split(b'\n'),
        )
        .map(|line| {
            line.map(|bytes| {
                let line = String::from_utf8_lossy(&bytes);
                line.strip_suffix('\r').unwrap_or(&line).to_string()
            })
        });

        Ok(StreamedProcess {
            lines: lines.boxed(),
            exit: async move { child.wait().await.map(ExitOutcome::from) }.boxed(),
        })
    }
}

/// Returns the path if `line` is the sentinel line, None for ordinary output
pub fn parse_final_path_line(line: &str) -> Option<&str> {
    let path = line.strip_prefix(FINAL_PATH_PREFIX)?.trim();
    if path.is_empty() {
        return None;
    }
    Some(path)
}

/// Forwards every line to `out` except the sentinel line, whose path is returned instead.
///
/// If the sentinel shows up more than once (playlists), the last one wins.
pub async fn relay_capturing_final_path(
    mut lines: impl futures::Stream<Item = std::io::Result<String>> + Unpin,
    out: &mut impl std::io::Write,
) -> crate::Result<Option<String>> {
    let mut final_path = None;
    while let Some(line) = lines.next().await {
        let line = line.map_err(crate::Error::StreamRead)?;
        match parse_final_path_line(&line) {
            Some(path) => final_path = Some(path.to_string()),
            None => {
                if let Err(e) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
                    log::debug!("failed to relay yt-dlp output: {}", e);
                }
            }
        }
    }
    Ok(final_path)
}

#[cfg(test)]
pub mod fake {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Call {
        pub program: std::path::PathBuf,
        pub args: Vec<String>,
        pub kind: &'static str,
    }

    type Hook = Box<dyn Fn(&std::path::Path, &[String]) + Send + Sync>;

    /// Replays canned transcripts in order and records what was asked of it
    #[derive(Default)]
    pub struct FakeRunner {
        pub calls: parking_lot::Mutex<Vec<Call>>,
        outputs: parking_lot::Mutex<std::collections::VecDeque<std::io::Result<ProcessOutput>>>,
        relays: parking_lot::Mutex<std::collections::VecDeque<ExitOutcome>>,
        streams: parking_lot::Mutex<
            std::collections::VecDeque<(Vec<std::io::Result<String>>, ExitOutcome)>,
        >,
        output_hook: Option<Hook>,
    }

    pub fn exit(code: i32) -> ExitOutcome {
        ExitOutcome { code: Some(code) }
    }

    pub fn stdout(code: i32, stdout: &str) -> std::io::Result<ProcessOutput> {
        Ok(ProcessOutput { exit: exit(code), stdout: stdout.into(), stderr: String::new() })
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_output(self, output: std::io::Result<ProcessOutput>) -> Self {
            self.outputs.lock().push_back(output);
            self
        }

        pub fn push_relay(self, exit: ExitOutcome) -> Self {
            self.relays.lock().push_back(exit);
            self
        }

        pub fn push_stream(self, lines: &[&str], exit: ExitOutcome) -> Self {
            let lines = lines.iter().map(|l| Ok(l.to_string())).collect();
            self.streams.lock().push_back((lines, exit));
            self
        }

        pub fn push_broken_stream(self) -> Self {
            let lines = vec![
                Ok("[download] 10%".to_string()),
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed")),
            ];
            self.streams.lock().push_back((lines, exit(0)));
            self
        }

        /// Runs before every `output` call, e.g. to create the file a fake ffmpeg would write
        pub fn with_output_hook(
            mut self,
            hook: impl Fn(&std::path::Path, &[String]) + Send + Sync + 'static,
        ) -> Self {
            self.output_hook = Some(Box::new(hook));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        fn record(&self, program: &std::path::Path, args: &[String], kind: &'static str) {
            let call = Call { program: program.to_path_buf(), args: args.to_vec(), kind };
            self.calls.lock().push(call);
        }
    }

    fn unscripted() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no scripted response")
    }

    #[async_trait::async_trait]
    impl CommandRunner for FakeRunner {
        async fn output(
            &self,
            program: &std::path::Path,
            args: &[String],
        ) -> std::io::Result<ProcessOutput> {
            self.record(program, args, "output");
            if let Some(hook) = &self.output_hook {
                hook(program, args);
            }
            self.outputs.lock().pop_front().unwrap_or_else(|| Err(unscripted()))
        }

        async fn relay(
            &self,
            program: &std::path::Path,
            args: &[String],
        ) -> std::io::Result<ExitOutcome> {
            self.record(program, args, "relay");
            self.relays.lock().pop_front().ok_or_else(unscripted)
        }

        fn spawn_lines(
            &self,
            program: &std::path::Path,
            args: &[String],
        ) -> std::io::Result<StreamedProcess> {
            self.record(program, args, "stream");
            let (lines, exit) = self.streams.lock().pop_front().ok_or_else(unscripted)?;
            Ok(StreamedProcess {
                lines: futures::stream::iter(lines).boxed(),
                exit: futures::future::ready(Ok(exit)).boxed(),
            })
        }
    }
}
