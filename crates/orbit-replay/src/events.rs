use crate::sys::script::ScriptLine;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum SimEvent {
    Script(ScriptLine),
    Tick(Duration),
    ScriptDone(Duration),
    ConfigReload,
}
