//! Descriptor collection for `asyd new`.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::Result;
use asyd_cli::commands::new::{NewArgs, NoPrompt, Prompt, collect_descriptor};
use asyd_cli::domain::ProjectKind;

/// Answers questions from a script and remembers what was asked.
struct ScriptedPrompt {
    answers: RefCell<VecDeque<&'static str>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    fn new(answers: &[&'static str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&self, question: &str, _default: Option<&str>, _allow_empty: bool) -> Result<String> {
        self.asked.borrow_mut().push(question.to_string());
        self.answers
            .borrow_mut()
            .pop_front()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("unexpected question '{question}'"))
    }
}

fn job_args() -> NewArgs {
    NewArgs {
        kind: ProjectKind::Job,
        name: "nightly".into(),
        host: Some("deploy@example.com".into()),
        workdir: Some("/srv/report".into()),
        entry: Some("run.sh".into()),
        schedule: Some("*-*-* 02:00:00".into()),
        ..NewArgs::default()
    }
}

#[test]
fn flags_fill_descriptor_without_prompting() {
    let d = collect_descriptor(job_args(), &NoPrompt).expect("all values given");

    assert_eq!(d.name, "nightly");
    assert_eq!(d.kind, ProjectKind::Job);
    assert_eq!(d.description, "");
    assert_eq!(d.service_user, "sudo");
    assert_eq!(d.schedule.as_deref(), Some("*-*-* 02:00:00"));
    assert!(d.validate().is_ok());
}

#[test]
fn missing_host_is_an_error_without_a_terminal() {
    let args = NewArgs {
        host: None,
        ..job_args()
    };

    let err = collect_descriptor(args, &NoPrompt).expect_err("host is required");

    assert!(err.to_string().contains("missing value"), "{err}");
}

#[test]
fn working_directory_defaults_to_current_dir() {
    let args = NewArgs {
        workdir: None,
        ..job_args()
    };

    let d = collect_descriptor(args, &NoPrompt).expect("default accepted");

    let cwd = std::env::current_dir().expect("cwd");
    assert_eq!(d.working_directory, cwd.to_string_lossy());
}

#[test]
fn only_missing_values_are_prompted() {
    let args = NewArgs {
        kind: ProjectKind::Server,
        name: "api".into(),
        user: Some("deploy".into()),
        workdir: Some("/home/me/api".into()),
        port: Some(2222),
        ..NewArgs::default()
    };
    let prompt = ScriptedPrompt::new(&["Public API", "deploy@example.com", "start.sh"]);

    let d = collect_descriptor(args, &prompt).expect("answers cover the gaps");

    assert_eq!(prompt.asked.borrow().len(), 3, "{:?}", prompt.asked.borrow());
    assert_eq!(d.description, "Public API");
    assert_eq!(d.host, "deploy@example.com");
    assert_eq!(d.entry_point, "start.sh");
    assert_eq!(d.service_user, "deploy");
    assert_eq!(d.ssh_port, Some(2222));
    assert_eq!(d.schedule, None, "servers are never asked for a schedule");
}
