//! taskdeck task command implementations.

use serde::Serialize;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::repo::TaskRepository;
use crate::task::{NewTaskInput, TaskFieldsInput, TaskUpdate};

pub struct AddOptions {
    pub title: String,
    pub description: String,
    pub due: String,
}

pub struct EditOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
}

pub fn run_add(repo: &TaskRepository, options: AddOptions, output: OutputOptions) -> Result<()> {
    let record = repo.create(NewTaskInput {
        title: options.title,
        description: options.description,
        due_date: options.due,
        completed: false,
    })?;

    let mut human = HumanOutput::new("Created task");
    human.push_summary("id", record.id.to_string());
    human.push_summary("title", record.title.clone());
    human.push_summary("due", record.due_date.to_rfc3339());

    emit_success(output, "add", &record, Some(&human))
}

pub fn run_list(repo: &TaskRepository, output: OutputOptions) -> Result<()> {
    let tasks = repo.list()?;

    let mut human = HumanOutput::new(format!("{} task(s)", tasks.len()));
    for task in &tasks {
        let marker = if task.completed { "x" } else { " " };
        human.push_detail(format!(
            "[{marker}] {}  {}  {}",
            task.id,
            task.due_date.format("%Y-%m-%d %H:%M"),
            task.title
        ));
    }

    emit_success(output, "list", &tasks, Some(&human))
}

pub fn run_set_completed(
    repo: &TaskRepository,
    id: &str,
    completed: bool,
    output: OutputOptions,
) -> Result<()> {
    let update = repo.update_fields(
        id,
        TaskFieldsInput {
            completed: Some(completed),
            ..TaskFieldsInput::default()
        },
    )?;

    let header = if completed {
        "Marked task completed"
    } else {
        "Reopened task"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("id", id);

    let command = if completed { "done" } else { "reopen" };
    emit_success(output, command, &applied(id, &update), Some(&human))
}

pub fn run_edit(
    repo: &TaskRepository,
    id: &str,
    options: EditOptions,
    output: OutputOptions,
) -> Result<()> {
    let update = repo.edit(
        id,
        TaskFieldsInput {
            title: options.title,
            description: options.description,
            due_date: options.due,
            completed: None,
        },
    )?;

    let mut human = HumanOutput::new("Edited task");
    human.push_summary("id", id);
    if let Some(title) = &update.title {
        human.push_summary("title", title.clone());
    }
    if let Some(due) = &update.due_date {
        human.push_summary("due", due.to_rfc3339());
    }

    emit_success(output, "edit", &applied(id, &update), Some(&human))
}

pub fn run_delete(repo: &TaskRepository, id: &str, output: OutputOptions) -> Result<()> {
    repo.delete(id)?;

    let mut human = HumanOutput::new("Deleted task");
    human.push_summary("id", id);

    #[derive(Serialize)]
    struct Deleted<'a> {
        id: &'a str,
    }

    emit_success(output, "rm", &Deleted { id }, Some(&human))
}

#[derive(Serialize)]
struct Applied<'a> {
    id: &'a str,
    #[serde(flatten)]
    update: &'a TaskUpdate,
}

fn applied<'a>(id: &'a str, update: &'a TaskUpdate) -> Applied<'a> {
    Applied { id, update }
}
