// shell.rs — Interactive navigation over a Session.
//
// Each line is one command against the current screen. The prompt shows the
// navigation state, so `paw detail(1)>` means the detail page of animal #1.
// Forms (submit, report) ask for their fields one prompt at a time.

use anyhow::Context;
use paw_core::{
    AnimalId, AnimalPage, IntakeForm, NavigationState, PawConfig, ReportCategory, Session, View,
    MANUAL_ENTRY_LABEL,
};
use paw_records::Animal;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::animal::print_profile;
use super::timeline::print_sightings;
use super::{event_dispatcher, open_store};

const HELP: &str = "\
commands:
  home              主页
  list              看看校园里的它们
  detail <id>       某只动物的档案和时间轴 (from list)
  submit            我今天遇见了它 (from home or detail)
  cancel            leave the sighting form
  report            举报与反馈 (from detail)
  back              report form → detail
  faq               这个项目是做什么的
  help | quit";

enum Flow {
    Continue,
    Quit,
}

struct SightingAnswers {
    choice: String,
    location: String,
    note: String,
    photo: String,
}

struct Shell {
    session: Session,
    editor: DefaultEditor,
    /// The open sighting form, kept so a rejected submission can be retried.
    form: Option<IntakeForm>,
}

pub fn execute(config: &PawConfig) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let mut shell = Shell {
        session: Session::from_config(store, config, event_dispatcher(config)),
        editor: DefaultEditor::new()?,
        form: None,
    };

    render_home();
    loop {
        let prompt = format!("paw {}> ", shell.session.state());
        let line = match shell.editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Err(e) = shell.editor.add_history_entry(line) {
            tracing::debug!(error = %e, "could not record shell history");
        }

        match shell.run(line) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("{}", failure_message(line, shell.session.state(), &e)),
        }
    }

    Ok(())
}

impl Shell {
    fn run(&mut self, line: &str) -> anyhow::Result<Flow> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "home" => {
                self.session.go_home();
                render_home();
            }
            "list" => render_list(&self.session.open_list()?),
            "detail" | "show" => {
                let id: AnimalId = arg
                    .parse()
                    .with_context(|| format!("expected an animal id, got {:?}", arg))?;
                render_page(&self.session.open_detail(id)?);
            }
            "faq" => {
                self.session.open_faq()?;
                render_faq();
            }
            "submit" => self.submit_sighting()?,
            "cancel" => {
                self.session.cancel_submit()?;
                self.form = None;
                render_home();
            }
            "report" => self.submit_report()?,
            "back" => render_page(&self.session.back_to_detail()?),
            "help" | "?" => println!("{}", HELP),
            "quit" | "exit" => return Ok(Flow::Quit),
            other => println!("unknown command {:?}; try `help`", other),
        }

        Ok(Flow::Continue)
    }

    fn submit_sighting(&mut self) -> anyhow::Result<()> {
        let form = match self.form.take() {
            Some(form) if self.session.state().view() == View::Submit => form,
            _ => self.session.open_submit()?,
        };

        let answers = match self.fill_sighting_form(&form) {
            Ok(answers) => answers,
            Err(e) => {
                self.form = Some(form);
                return Err(e);
            }
        };

        match self.session.submit_sighting(
            &answers.choice,
            &answers.location,
            &answers.note,
            Some(answers.photo.as_str()),
        ) {
            Ok(sighting) => {
                println!("记录成功！感谢你的温柔遇见。 ({})", sighting.id);
                render_home();
                Ok(())
            }
            Err(e) => {
                // Validation and selection errors leave the form open.
                if self.session.state().view() == View::Submit {
                    self.form = Some(form);
                    println!("(form kept; `submit` to retry, `cancel` to leave)");
                }
                Err(e.into())
            }
        }
    }

    fn fill_sighting_form(&mut self, form: &IntakeForm) -> anyhow::Result<SightingAnswers> {
        println!("你遇见了谁？");
        for (i, option) in form.animals.options().iter().enumerate() {
            let mark = if i == form.default_index { "*" } else { " " };
            println!("{} {:>2}. {}", mark, i + 1, option.label);
        }
        let labels: Vec<String> = form.animals.labels().map(str::to_string).collect();
        let answer = self.ask("选择 [回车 = *]: ")?;
        let choice = pick(&answer, &labels, Some(form.default_index)).unwrap_or_default();

        println!("在哪里遇见的？");
        for (i, location) in form.locations.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, location);
        }
        let answer = self.ask("地点: ")?;
        let mut location = pick(&answer, &form.locations, None).unwrap_or_default();
        if location == MANUAL_ENTRY_LABEL {
            location = self.ask("请输入地点名称: ")?;
        }

        Ok(SightingAnswers {
            choice,
            location,
            note: self.ask("它当时在做什么？(可选) ")?,
            photo: self.ask("照片 (可选): ")?,
        })
    }

    fn submit_report(&mut self) -> anyhow::Result<()> {
        if self.session.state().view() != View::Report {
            let animal = self.session.open_report()?;
            println!("举报与反馈: #{} {}", animal.id, animal.name);
            println!("如果你发现以下情况，请务必告诉我们：");
        }

        let labels: Vec<String> = ReportCategory::ALL
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        for (i, label) in labels.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, label);
        }
        let answer = self.ask("问题类型: ")?;
        let category = pick(&answer, &labels, None).unwrap_or_default();
        let detail = self.ask("详细描述 (可选): ")?;

        let result = self.session.submit_report(&category, &detail);
        if result.is_err() && self.session.state().view() == View::Report {
            println!("(form kept; `report` to retry, `back` to leave)");
        }
        result?;

        println!("反馈已收到，我们会尽快处理。");
        render_list(&self.session.registry().list_animals()?);
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
        Ok(self.editor.readline(prompt)?.trim().to_string())
    }
}

/// The line printed for a failed command. The full chain is also logged
/// with the screen it failed on.
fn failure_message(command: &str, state: NavigationState, error: &anyhow::Error) -> String {
    tracing::debug!(command, state = %state, "shell command failed: {:#}", error);
    format!("! {:#}", error)
}

/// Resolve a form answer: a 1-based number picks from `options`, anything
/// else is taken verbatim, and an empty answer takes `default`.
fn pick(answer: &str, options: &[String], default: Option<usize>) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return default.and_then(|i| options.get(i)).cloned();
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => Some(options[n - 1].clone()),
        _ => Some(answer.to_string()),
    }
}

fn render_home() {
    println!();
    println!("🐾 爪爪星球");
    println!("记录校园里，被温柔遇见的瞬间");
    println!();
    println!("这是一个匿名、公益性质的校园动物记录工具。");
    println!("我们不鼓励投喂，用手接触动物，希望通过记录让它们成为校园生活中可被看见的一员。");
    println!();
    println!("  list    看看校园里的它们");
    println!("  submit  我今天遇见了它");
    println!("  faq     这个项目是做什么的");
    println!();
}

fn render_list(animals: &[Animal]) {
    println!();
    println!("校园萌友录");
    if animals.is_empty() {
        println!("  (还没有动物建档)");
    }
    for a in animals {
        println!(
            "  #{:<4} {}  {}  {}  {}",
            a.id,
            a.name,
            a.species_tag,
            a.sterilization_status.label(),
            a.traits
        );
    }
    println!();
}

fn render_page(page: &AnimalPage) {
    println!();
    print_profile(&page.animal);
    println!();
    println!("时间轴:");
    if page.timeline.is_empty() {
        println!("  (还没有人遇见过它)");
    } else {
        print_sightings(&page.timeline);
    }
    println!();
}

fn render_faq() {
    println!();
    println!("关于爪爪星球");
    println!();
    println!("为什么要发起这个项目？");
    println!("  我们希望通过非侵入性的方式，让校园里的流浪猫狗等动物被“看见”。");
    println!();
    println!("核心原则");
    println!("  1. 不干扰原则：记录而不打扰，远观而不投喂。");
    println!("  2. 隐私保护：所有记录匿名化，不公开精确坐标以防恶意伤害。");
    println!("  3. 健康监测：通过时间轴观察动物的状态（如是否绝育、是否受伤）。");
    println!();
    println!("如何贡献？");
    println!("  看到它们时，随手拍一张照，选择对应的点位提交即可。");
    println!();
}
