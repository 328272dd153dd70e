//! Definiciones de registros para el MPU9250
//!
//! El MPU9250 no usa bancos: todos los registros del die principal viven en
//! un único espacio de direcciones de 8 bits. El magnetómetro AK8963 es un
//! periférico I2C aparte, con su propio mapa, accesible en modo bypass o a
//! través de las líneas esclavas del máster I2C interno.

/// Registros del die principal del MPU9250
pub mod mpu {
    // Registros de configuración de muestreo y filtro
    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_CONFIG_2: u8 = 0x1D;
    pub const LP_ACCEL_ODR: u8 = 0x1E;
    pub const WOM_THR: u8 = 0x1F;

    // Registros del máster I2C interno y líneas esclavas
    pub const I2C_MST_CTRL: u8 = 0x24;
    pub const I2C_SLV0_ADDR: u8 = 0x25;
    pub const I2C_SLV0_REG: u8 = 0x26;
    pub const I2C_SLV0_CTRL: u8 = 0x27;
    pub const I2C_SLV1_ADDR: u8 = 0x28;
    pub const I2C_SLV1_REG: u8 = 0x29;
    pub const I2C_SLV1_CTRL: u8 = 0x2A;
    pub const I2C_SLV4_CTRL: u8 = 0x34;
    pub const I2C_SLV0_DO: u8 = 0x63;
    pub const I2C_SLV1_DO: u8 = 0x64;
    pub const I2C_MST_DELAY_CTRL: u8 = 0x67;

    // Registros de interrupciones
    pub const INT_PIN_CFG: u8 = 0x37;
    pub const INT_ENABLE: u8 = 0x38;
    pub const INT_STATUS: u8 = 0x3A;

    // Registros de datos (lecturas burst big-endian)
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const TEMP_OUT_H: u8 = 0x41;
    pub const GYRO_XOUT_H: u8 = 0x43;

    // Datos externos retransmitidos por las líneas esclavas
    pub const EXT_SENS_DATA_00: u8 = 0x49;

    // Detección de movimiento
    pub const MOT_DETECT_CTRL: u8 = 0x69;

    // Registros de control y energía
    pub const USER_CTRL: u8 = 0x6A;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const PWR_MGMT_2: u8 = 0x6C;

    // Registro de identificación
    pub const WHO_AM_I: u8 = 0x75;
}

/// Registros del magnetómetro AK8963 (dirección I2C propia)
pub mod ak8963 {
    // Identificación y estado
    pub const WIA: u8 = 0x00;
    pub const ST1: u8 = 0x02;

    // Datos de medición (little-endian, HXL primero)
    pub const HXL: u8 = 0x03;

    // Control de modo
    pub const CNTL1: u8 = 0x0A;

    // ROM de ajustes de sensibilidad de fábrica
    pub const ASAX: u8 = 0x10;
    pub const ASAY: u8 = 0x11;
    pub const ASAZ: u8 = 0x12;
}
