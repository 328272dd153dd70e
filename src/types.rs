//! Definiciones de tipos y constantes comunes para el MPU9250

/// Escalas completas disponibles para el giroscopio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroFullScale {
    /// ±250 dps
    Fs250Dps = 0,
    /// ±500 dps
    Fs500Dps = 1,
    /// ±1000 dps
    Fs1000Dps = 2,
    /// ±2000 dps
    Fs2000Dps = 3,
}

impl Default for GyroFullScale {
    fn default() -> Self {
        GyroFullScale::Fs250Dps
    }
}

// Añadimos implementación para convertir desde u8
impl From<u8> for GyroFullScale {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => GyroFullScale::Fs250Dps,
            1 => GyroFullScale::Fs500Dps,
            2 => GyroFullScale::Fs1000Dps,
            _ => GyroFullScale::Fs2000Dps,
        }
    }
}

impl GyroFullScale {
    /// Valor a escribir en el registro GYRO_CONFIG (bits [4:3])
    pub const fn reg_bits(self) -> u8 {
        (self as u8) << 3
    }

    /// Límite superior del rango en grados/segundo
    pub const fn dps(self) -> i32 {
        match self {
            GyroFullScale::Fs250Dps => 250,
            GyroFullScale::Fs500Dps => 500,
            GyroFullScale::Fs1000Dps => 1000,
            GyroFullScale::Fs2000Dps => 2000,
        }
    }
}

/// Escalas completas disponibles para el acelerómetro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelFullScale {
    /// ±2g
    Fs2G = 0,
    /// ±4g
    Fs4G = 1,
    /// ±8g
    Fs8G = 2,
    /// ±16g
    Fs16G = 3,
}

impl Default for AccelFullScale {
    fn default() -> Self {
        AccelFullScale::Fs16G
    }
}

// Añadimos implementación para convertir desde u8
impl From<u8> for AccelFullScale {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => AccelFullScale::Fs2G,
            1 => AccelFullScale::Fs4G,
            2 => AccelFullScale::Fs8G,
            _ => AccelFullScale::Fs16G,
        }
    }
}

impl AccelFullScale {
    /// Valor a escribir en el registro ACCEL_CONFIG (bits [4:3])
    pub const fn reg_bits(self) -> u8 {
        (self as u8) << 3
    }

    /// Límite superior del rango en mili-g
    pub const fn mg(self) -> i32 {
        match self {
            AccelFullScale::Fs2G => 2000,
            AccelFullScale::Fs4G => 4000,
            AccelFullScale::Fs8G => 8000,
            AccelFullScale::Fs16G => 16000,
        }
    }
}

/// Estado de alimentación de un sub-sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorPower {
    /// Sub-sensor apagado (standby)
    Off,
    /// Sub-sensor encendido
    On,
}

/// Ajustes del filtro paso bajo compartido (registro CONFIG, DLPF_CFG)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum DlpfBandwidth {
    /// 184 Hz
    Hz184 = 1,
    /// 92 Hz
    Hz92 = 2,
    /// 41 Hz
    Hz41 = 3,
    /// 20 Hz
    Hz20 = 4,
    /// 10 Hz
    Hz10 = 5,
    /// 5 Hz
    Hz5 = 6,
}

impl DlpfBandwidth {
    /// Valor a escribir en los registros de filtro
    pub const fn reg_bits(self) -> u8 {
        self as u8
    }

    /// Selecciona el ajuste más ancho cuyo corte queda por encima de la
    /// mitad de la tasa de muestreo objetivo
    pub const fn for_half_rate(half_rate: u16) -> Self {
        if half_rate >= 184 {
            DlpfBandwidth::Hz184
        } else if half_rate >= 92 {
            DlpfBandwidth::Hz92
        } else if half_rate >= 42 {
            DlpfBandwidth::Hz41
        } else if half_rate >= 20 {
            DlpfBandwidth::Hz20
        } else if half_rate >= 10 {
            DlpfBandwidth::Hz10
        } else {
            DlpfBandwidth::Hz5
        }
    }
}

/// Tiempos de asentamiento del hardware, en microsegundos
///
/// El chip exige tiempo real transcurrido tras ciertos comandos antes de
/// aceptar el siguiente; revisiones distintas del silicio pueden requerir
/// recalibrar estos valores, así que forman parte de los parámetros del
/// dispositivo en lugar de quedar enterrados en las secuencias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettleDelays {
    /// Tras un reset del registro maestro de energía
    pub reset_us: u32,
    /// Tras un cambio de modo de energía
    pub pwr_change_us: u32,
    /// Tras un comando de modo al magnetómetro
    pub comp_mode_us: u32,
    /// Tras conmutar el modo bypass
    pub bypass_us: u32,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            reset_us: 100_000,
            pwr_change_us: 50_000,
            comp_mode_us: 1_000,
            bypass_us: 3_000,
        }
    }
}

/// Límites de las tasas de muestreo soportadas
pub mod rates {
    /// Tasa base del grupo principal (Hz)
    pub const BASE_SAMPLE_RATE: u16 = 1000;
    /// Tasa mínima configurable del grupo principal (Hz)
    pub const MIN_SAMPLE_RATE: u16 = 4;
    /// Tasa máxima configurable del grupo principal (Hz)
    pub const MAX_SAMPLE_RATE: u16 = 1000;
    /// Tasa mínima del relé del magnetómetro (Hz)
    pub const MIN_COMP_SAMPLE_RATE: u8 = 1;
    /// Tasa máxima del relé del magnetómetro (Hz)
    pub const MAX_COMP_SAMPLE_RATE: u8 = 100;
}

/// Bits útiles para configuración y control
pub mod bits {
    // Power management 1
    pub const H_RESET: u8 = 0x80;
    pub const SLEEP: u8 = 0x40;
    pub const CYCLE: u8 = 0x20;
    pub const CLK_PLL: u8 = 0x01;
    pub const WAKEUP: u8 = 0x00;

    // Power management 2 (bits de standby por sub-sensor)
    pub const PWR_ACCEL_STBY: u8 = 0x38; // bits 5:3
    pub const PWR_GYRO_STBY: u8 = 0x07; // bits 2:0

    // User control
    pub const I2C_MST_EN: u8 = 0x20;

    // I2C master y líneas esclavas
    pub const WAIT_FOR_ES: u8 = 0x40;
    pub const SLAVE_RW: u8 = 0x80;
    pub const SLAVE_EN: u8 = 0x80;
    pub const SLV0_DELAY_EN: u8 = 0x01;
    pub const SLV1_DELAY_EN: u8 = 0x02;

    // Pin de interrupción y habilitación
    pub const INT_ANYRD_2CLEAR: u8 = 0x10;
    pub const INT_RAW_RDY_EN: u8 = 0x01;
    pub const INT_WOM_EN: u8 = 0x40;
    pub const INT_BYPASS_EN: u8 = 0x02;

    // Registro de estado de interrupción
    pub const INT_STATUS_WOM: u8 = 0x40;
    pub const INT_STATUS_RAW: u8 = 0x01;

    // Wake-on-motion
    pub const ACCEL_INTEL_CFG: u8 = 0xC0; // INTEL_EN | INTEL_MODE
    pub const ACCEL_CFG_WOM: u8 = 0x09; // fchoice_b = 1, ancho de banda 184 Hz

    // Máscaras de los bits fchoice / DLPF
    pub const GYRO_FCHOICE_MASK: u8 = 0x03;
    pub const ACCEL_DLPF_MASK: u8 = 0x0F;
}

/// Valores específicos para registros del magnetómetro
pub mod ak_val {
    pub const WIA_VAL: u8 = 0x48; // Valor esperado en registro WIA
    pub const POWER_DOWN: u8 = 0x00; // Modo power down
    pub const SINGLE_MEASURE: u8 = 0x01; // Modo de medición única
    pub const FUSE_ROM_ACCESS: u8 = 0x0F; // Modo de acceso a ROM de calibración
}

/// Lectura del acelerómetro en mili-g
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelData {
    /// Aceleración en el eje X (mg)
    pub x: i16,
    /// Aceleración en el eje Y (mg)
    pub y: i16,
    /// Aceleración en el eje Z (mg)
    pub z: i16,
}

/// Lectura del giroscopio en grados/segundo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroData {
    /// Velocidad angular en el eje X (°/s)
    pub x: i16,
    /// Velocidad angular en el eje Y (°/s)
    pub y: i16,
    /// Velocidad angular en el eje Z (°/s)
    pub z: i16,
}

/// Lectura del magnetómetro, ya ajustada y escalada (0.3 unidades por LSB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompassData {
    /// Campo magnético en el eje X
    pub x: i16,
    /// Campo magnético en el eje Y
    pub y: i16,
    /// Campo magnético en el eje Z
    pub z: i16,
}
