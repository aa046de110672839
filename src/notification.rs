use crate::error::RosterError;
use crate::model::{Shift, Staff, StaffId};
use crate::roster::{Observer, Roster, RosterUpdate};
use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Avis adressé à un membre du personnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub receiver: StaffId,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new<M: Into<String>>(receiver: StaffId, message: M) -> Self {
        Self {
            id: NotificationId::random(),
            receiver,
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// Collaborateur qui crée (et possède) les notifications.
pub trait NotificationSink: Send + Sync {
    fn create_notification(&self, receiver: &StaffId, message: &str) -> Result<Notification>;
}

/// Stockage en mémoire des notifications, avec suivi lu/non lu.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Mutex<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Notifications d'une personne, la plus récente d'abord.
    pub fn for_receiver(&self, receiver: &StaffId) -> Vec<Notification> {
        self.lock()
            .iter()
            .rev()
            .filter(|n| &n.receiver == receiver)
            .cloned()
            .collect()
    }

    pub fn unread_count(&self, receiver: &StaffId) -> usize {
        self.lock()
            .iter()
            .filter(|n| &n.receiver == receiver && !n.read)
            .count()
    }

    /// Marque comme lue une notification de `receiver` ; celles des autres
    /// sont refusées.
    pub fn mark_as_read(
        &self,
        receiver: &StaffId,
        id: &NotificationId,
    ) -> crate::error::Result<Notification> {
        let mut items = self.lock();
        let notification = items
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| RosterError::NotFound(format!("notification {}", id.as_str())))?;
        if &notification.receiver != receiver {
            return Err(RosterError::Forbidden(format!(
                "notification {} belongs to another staff member",
                id.as_str()
            )));
        }
        notification.read = true;
        Ok(notification.clone())
    }

    /// Supprime toutes les notifications d'une personne ; renvoie le nombre retiré.
    pub fn clear(&self, receiver: &StaffId) -> usize {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|n| &n.receiver != receiver);
        before - items.len()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl NotificationSink for NotificationCenter {
    fn create_notification(&self, receiver: &StaffId, message: &str) -> Result<Notification> {
        let notification = Notification::new(receiver.clone(), message);
        self.lock().push(notification.clone());
        Ok(notification)
    }
}

/// Adaptateur qui donne à un `Staff` la capacité d'observer un roster.
pub struct StaffObserver {
    staff: Staff,
    sink: Arc<dyn NotificationSink>,
}

impl StaffObserver {
    pub fn new(staff: Staff, sink: Arc<dyn NotificationSink>) -> Self {
        Self { staff, sink }
    }

    pub fn staff(&self) -> &Staff {
        &self.staff
    }
}

impl Observer for StaffObserver {
    fn observer_key(&self) -> &str {
        self.staff.id.as_str()
    }

    fn update(&self, update: &RosterUpdate<'_>) -> Result<()> {
        self.sink
            .create_notification(&self.staff.id, update.message)
            .map(|_| ())
    }
}

/// Attache un `StaffObserver` par membre ; renvoie le nombre de nouveaux attachements.
pub fn attach_staff(roster: &Roster, staff: &[Staff], sink: &Arc<dyn NotificationSink>) -> usize {
    let mut attached = 0;
    for member in staff {
        let observer = StaffObserver::new(member.clone(), Arc::clone(sink));
        if roster.attach(Arc::new(observer)) {
            attached += 1;
        }
    }
    attached
}

#[derive(Debug, Default)]
pub struct DispatchReport {
    pub sent: Vec<Notification>,
    pub failures: Vec<(StaffId, String)>,
}

/// Un avis par personne assignée dans le roster, dans l'ordre de première apparition.
pub fn dispatch_to_assigned(roster: &Roster, sink: &dyn NotificationSink) -> DispatchReport {
    let name = roster.display_name();
    let mut report = DispatchReport::default();
    for receiver in roster.assigned_staff() {
        let count = roster.shifts_for(&receiver).len();
        let message = format!("Roster '{name}' assigns you {count} shift(s)");
        match sink.create_notification(&receiver, &message) {
            Ok(notification) => report.sent.push(notification),
            Err(err) => {
                tracing::warn!(receiver = %receiver, error = %err, "notification dispatch failed");
                report.failures.push((receiver, format!("{err:#}")));
            }
        }
    }
    report
}

/// Représente un rappel généré pour une personne.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub receiver: StaffId,
    pub shift_id: String,
    pub notice_at: DateTime<Utc>,
    pub content: String,
}

/// Permet de customiser le rendu du message (texte, SMS, etc.).
pub trait ReminderRenderer {
    fn render(&self, staff: &Staff, roster_name: &str, shift: &Shift, notice_at: DateTime<Utc>) -> String;
}

/// Gabarit texte simple destiné à un futur mail/SMS.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, staff: &Staff, roster_name: &str, shift: &Shift, notice_at: DateTime<Utc>) -> String {
        format!(
            "Bonjour {name},\n\nTu travailles sur le planning \"{roster}\" du {start} au {end}.\nCe message est généré le {notice}.\n",
            name = staff.name,
            roster = roster_name,
            start = shift.start.to_rfc3339(),
            end = shift.end.to_rfc3339(),
            notice = notice_at.to_rfc3339()
        )
    }
}

/// Prépare un rappel pour le prochain shift d'une personne dans un roster.
pub fn prepare_reminder(
    roster: &Roster,
    staff: &Staff,
    days_before: i64,
    now: DateTime<Utc>,
    renderer: &dyn ReminderRenderer,
) -> Result<Reminder> {
    if days_before < 0 {
        bail!("days_before must be positive");
    }

    let Some(shift) = roster
        .shifts_for(&staff.id)
        .into_iter()
        .find(|shift| shift.start >= now)
    else {
        bail!("no upcoming shift found for staff {}", staff.id);
    };

    let notice_at = shift.start - Duration::days(days_before);
    let content = renderer.render(staff, &roster.display_name(), &shift, notice_at);
    Ok(Reminder {
        receiver: staff.id.clone(),
        shift_id: shift.id.as_str().to_string(),
        notice_at,
        content,
    })
}
