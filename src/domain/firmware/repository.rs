//! Status repositories keyed by charge station id

use super::model::{DiagnosticsStatus, FirmwareStatus, PublishFirmwareStatus, StatusRecord};

pub trait FirmwareStatusRepository: Send + Sync {
    fn set_firmware_status(&self, charge_station_id: &str, status: FirmwareStatus);
    fn get_firmware_status(&self, charge_station_id: &str) -> Option<StatusRecord<FirmwareStatus>>;

    fn set_diagnostics_status(&self, charge_station_id: &str, status: DiagnosticsStatus);
    fn get_diagnostics_status(
        &self,
        charge_station_id: &str,
    ) -> Option<StatusRecord<DiagnosticsStatus>>;

    fn set_publish_firmware_status(&self, charge_station_id: &str, status: PublishFirmwareStatus);
    fn get_publish_firmware_status(
        &self,
        charge_station_id: &str,
    ) -> Option<StatusRecord<PublishFirmwareStatus>>;
}
