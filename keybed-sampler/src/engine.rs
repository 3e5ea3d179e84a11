use crate::command::Command;
use crate::sampler::Sampler;

/// Size of the UI -> audio command queue
pub const COMMAND_QUEUE_SIZE: usize = 256;

/// Audio-thread side: owns the sampler and drains the command queue
pub struct SamplerEngine {
    sampler: Sampler,
    command_rx: rtrb::Consumer<Command>,
    sample_rate: u32,
    channels: usize,
}

impl SamplerEngine {
    pub fn new(
        sampler: Sampler,
        sample_rate: u32,
        channels: usize,
        command_rx: rtrb::Consumer<Command>,
    ) -> Self {
        Self {
            sampler,
            command_rx,
            sample_rate,
            channels,
        }
    }

    /// Create an engine together with the controller that feeds it
    pub fn with_controller(sampler: Sampler, sample_rate: u32, channels: usize) -> (Self, SamplerController) {
        let (command_tx, command_rx) = rtrb::RingBuffer::<Command>::new(COMMAND_QUEUE_SIZE);
        (
            Self::new(sampler, sample_rate, channels, command_rx),
            SamplerController { command_tx },
        )
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Process audio callback, called from the audio thread
    pub fn process(&mut self, output: &mut [f32]) {
        while let Ok(cmd) = self.command_rx.pop() {
            self.handle_command(cmd);
        }

        self.sampler.process(output, self.channels, self.sample_rate);
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::NoteOn(note) => self.sampler.note_on(note),
            Command::NoteOff(note) => self.sampler.note_off(note, self.sample_rate),
            Command::AllNotesOff => self.sampler.all_notes_off(self.sample_rate),
        }
    }
}

/// UI-thread side of the command queue
pub struct SamplerController {
    command_tx: rtrb::Producer<Command>,
}

impl SamplerController {
    pub fn note_on(&mut self, note: u8) {
        self.send(Command::NoteOn(note));
    }

    pub fn note_off(&mut self, note: u8) {
        self.send(Command::NoteOff(note));
    }

    pub fn all_notes_off(&mut self) {
        self.send(Command::AllNotesOff);
    }

    fn send(&mut self, cmd: Command) {
        if self.command_tx.push(cmd).is_err() {
            log::warn!("Audio command queue full, dropped {:?}", cmd);
        }
    }
}
