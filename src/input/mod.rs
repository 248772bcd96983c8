mod event;
mod gateway;
mod touch;

pub use event::{parse_input_event, ABS_MT_POSITION_X, EV_ABS, EV_KEY, EV_SYN, INPUT_EVENT_SIZE};
pub use gateway::{EvdevGateway, InputGateway};
pub use touch::TouchDecoder;
