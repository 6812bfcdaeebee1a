//! Contract endpoints: CRUD, events, approval flow and financial report.

use super::ApiClient;
use crate::error::Result;
use crate::models::contract::{ApprovalDecision, ApprovalStep, Contract, ContractEvent, ContractInput, FinancialReport};

/// List all contracts.
pub async fn list_all(client: &ApiClient) -> Result<Vec<Contract>> {
    client.get("contracts").await
}

/// Create a new contract.
pub async fn create(client: &ApiClient, data: &ContractInput) -> Result<Contract> {
    client.post("contracts", data).await
}

/// Replace an existing contract.
pub async fn update(client: &ApiClient, id: i64, data: &ContractInput) -> Result<Contract> {
    client.put(&format!("contracts/{id}"), data).await
}

/// Delete a contract by ID.
pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    client.delete(&format!("contracts/{id}")).await
}

/// Timeline of a contract, newest first as sent by the backend.
pub async fn events(client: &ApiClient, id: i64) -> Result<Vec<ContractEvent>> {
    client.get(&format!("contracts/{id}/events")).await
}

/// Approval levels and their decisions for a contract.
pub async fn approval_flow(client: &ApiClient, id: i64) -> Result<Vec<ApprovalStep>> {
    let mut steps: Vec<ApprovalStep> = client.get(&format!("contracts/{id}/approval-flow")).await?;
    steps.sort_by_key(|s| s.order);
    Ok(steps)
}

/// Approve or reject the pending level; returns the updated flow.
pub async fn decide(client: &ApiClient, id: i64, decision: &ApprovalDecision) -> Result<Vec<ApprovalStep>> {
    let mut steps: Vec<ApprovalStep> = client
        .post(&format!("contracts/{id}/approval-flow/decision"), decision)
        .await?;
    steps.sort_by_key(|s| s.order);
    Ok(steps)
}

pub async fn financial_report(client: &ApiClient, id: i64) -> Result<FinancialReport> {
    client.get(&format!("contracts/{id}/financial-report")).await
}
