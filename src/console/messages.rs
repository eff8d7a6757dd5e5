//! Console text, byte for byte as the terminal sees it.

pub const ALARM_ON: &str = "The alarm is activated\r\n";
pub const ALARM_OFF: &str = "The alarm is not activated\r\n";

// Legacy firmware sent 22 bytes and dropped the trailing LF; this ends in a full CRLF.
pub const GAS_ON: &str = "Gas is being detected\r\n";
pub const GAS_OFF: &str = "Gas is not being detected\r\n";

pub const OVER_TEMP_ON: &str = "Temperature is above the maximum level\r\n";
pub const OVER_TEMP_OFF: &str = "Temperature is below the maximum level\r\n";

pub const ENTER_CODE_PROMPT: &str = concat!(
    "Please enter the code sequence.\r\n",
    "First enter 'A', then 'B', then 'C', and ",
    "finally 'D' button\r\n",
    "In each case type 1 for pressed or 0 for ",
    "not pressed\r\n",
    "For example, for 'A' = pressed, ",
    "'B' = pressed, 'C' = not pressed, ",
    "'D' = not pressed, enter '1', then '1', ",
    "then '0', and finally '0'\r\n\r\n",
);

pub const NEW_CODE_PROMPT: &str = concat!(
    "Please enter new code sequence\r\n",
    "First enter 'A', then 'B', then 'C', and ",
    "finally 'D' button\r\n",
    "In each case type 1 for pressed or 0 for not ",
    "pressed\r\n",
    "For example, for 'A' = pressed, 'B' = pressed,",
    " 'C' = not pressed,",
    "'D' = not pressed, enter '1', then '1', ",
    "then '0', and finally '0'\r\n\r\n",
);

pub const DIGIT_ECHO: &str = "*";

pub const CODE_CORRECT: &str = "\r\nThe code is correct\r\n\r\n";
pub const CODE_INCORRECT: &str = "\r\nThe code is incorrect\r\n\r\n";
pub const NEW_CODE_GENERATED: &str = "\r\nNew code generated\r\n\r\n";
pub const ENTRY_TIMED_OUT: &str = "\r\nCode entry timed out\r\n\r\n";

/// Latin-1 degree sign, sent as a single raw byte.
pub const DEGREE: u8 = 0xB0;

pub const HELP: &str = concat!(
    "Available commands:\r\n",
    "Press '1' to get the alarm state\r\n",
    "Press '2' to get the gas detector state\r\n",
    "Press '3' to get the over temperature detector state\r\n",
    "Press '4' to enter the code sequence\r\n",
    "Press '5' to enter a new code\r\n",
    "Press 'P' or 'p' to get potentiometer reading\r\n",
    "Press 'f' or 'F' to get lm35 reading in Fahrenheit\r\n",
    "Press 'c' or 'C' to get lm35 reading in Celsius\r\n\r\n",
);
