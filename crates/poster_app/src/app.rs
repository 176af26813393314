use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use log::LevelFilter;
use poster_core::{update, AppState, AppViewModel, LifecycleState, Msg};
use poster_engine::EngineHandle;
use poster_logging::{poster_info, poster_warn};

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::{config, logging, render};

/// How long one loop iteration waits for an engine event.
const TICK: Duration = Duration::from_millis(75);

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let loaded = config::load(&config_path);
    let mut config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => config::ClientConfig::default(),
    };
    cli.apply_overrides(&mut config);

    logging::initialize(config.log, LevelFilter::Info);
    if let Err(err) = &loaded {
        poster_warn!("Ignoring config, using defaults: {:#}", err);
    }

    let params = cli.job_params();
    params.validate().context("cannot submit")?;

    let engine = EngineHandle::new(config.engine_settings())
        .with_context(|| format!("cannot use base url {:?}", config.base_url))?;
    let mut controller = Controller::new(EffectRunner::new(engine));

    controller.dispatch(Msg::FormChanged(params));
    controller.dispatch(Msg::GenerateClicked);

    loop {
        let msg = controller.runner.next_msg(TICK);
        controller.dispatch(msg);

        let view = controller.state.view();
        if !view.state.is_terminal() {
            continue;
        }
        if cli.wait_notification && view.notification.is_some() {
            continue;
        }
        break;
    }

    let state = controller.state.lifecycle();
    controller.teardown();
    poster_info!("Finished in state {}", state.as_str());
    Ok(exit_code(state))
}

fn exit_code(state: LifecycleState) -> ExitCode {
    match state {
        LifecycleState::Completed => ExitCode::SUCCESS,
        LifecycleState::RateLimited => ExitCode::from(2),
        LifecycleState::Idle | LifecycleState::Generating | LifecycleState::Error => {
            ExitCode::FAILURE
        }
    }
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
    last_status: Option<String>,
    last_notice: Option<String>,
}

impl Controller {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            last_status: None,
            last_notice: None,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.view();
        state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);

        if view.dirty {
            self.render(&view);
        }
    }

    fn render(&mut self, view: &AppViewModel) {
        let status = render::status_line(view);
        if self.last_status.as_deref() != Some(status.as_str()) {
            println!("[{}] {}", Local::now().format("%H:%M:%S"), status);
            self.last_status = Some(status);
        }

        let notice = render::notification_line(view);
        if notice != self.last_notice {
            if let Some(line) = &notice {
                println!("[{}] {}", Local::now().format("%H:%M:%S"), line);
            }
            self.last_notice = notice;
        }
    }

    fn teardown(&mut self) {
        self.runner.shutdown();
    }
}
