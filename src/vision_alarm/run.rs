use super::main::VisionAlarm;
use crate::vision_alarm::core::{init, transition, Effect, Model, Msg};
use rand::Rng;
use std::sync::PoisonError;

impl VisionAlarm {
    pub fn run(&self) -> Result<Model, Box<dyn std::error::Error + Send + Sync>> {
        self.run_with_rng(&mut rand::rng())
    }

    /// Runs until the model reports it is finished. All model changes and
    /// overlay updates happen on the calling thread. The camera is stopped
    /// and pending polls are cancelled however the loop ends.
    pub fn run_with_rng<R: Rng>(
        &self,
        rng: &mut R,
    ) -> Result<Model, Box<dyn std::error::Error + Send + Sync>> {
        let (mut current_model, effects) = init(&self.config, rng);

        let outcome = self.run_loop(&mut current_model, effects, rng);
        let shutdown = self.shutdown(&current_model);

        outcome?;
        shutdown?;

        match &current_model.fatal {
            Some(message) => {
                self.logger.error(message)?;
                Err(message.clone().into())
            }
            None => Ok(current_model),
        }
    }

    fn run_loop<R: Rng>(
        &self,
        current_model: &mut Model,
        effects: Vec<Effect>,
        rng: &mut R,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.render.render(current_model)?;
        self.execute_effects(effects);

        while !current_model.is_finished() {
            let msg = self.recv()?;
            let msg_display = format!("{:?}", msg);

            let (new_model, effects) =
                transition(&self.config, std::mem::take(current_model), msg, rng);
            *current_model = new_model;

            if !effects.is_empty() {
                self.logger
                    .info(&format!("msg: {} -> effects: {:?}", msg_display, effects))?;
            }

            self.render.render(current_model)?;

            self.execute_effects(effects);
        }

        Ok(())
    }

    fn recv(&self) -> Result<Msg, Box<dyn std::error::Error + Send + Sync>> {
        let receiver = self.msg_receiver.lock().map_err(|e| e.to_string())?;
        Ok(receiver.recv()?)
    }

    fn execute_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            if effect.is_foreground() {
                self.run_effect(effect);
            } else {
                let self_clone = self.clone();
                std::thread::spawn(move || self_clone.run_effect(effect));
            }
        }
    }

    fn shutdown(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        for (_, cancel) in self
            .polls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
        {
            let _ = cancel.send(());
        }

        let stopped = self.device_camera.stop();

        self.logger.info(&format!("Finished: {:?}", model.stats))?;
        if let Err(e) = stopped {
            self.logger.error(&format!("camera failed to stop: {}", e))?;
        }

        Ok(())
    }
}
