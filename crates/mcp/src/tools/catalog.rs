// Closed catalog of every tool the server can expose

use crate::error::ToolError;
use crate::tools::schema::ToolSpec;
use crate::tools::{accounts, analytics, background_jobs, campaigns, emails, lead_lists, leads, server_info};
use instantly_core::Category;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolName {
    ListAccounts,
    GetAccount,
    CreateAccount,
    UpdateAccount,
    ManageAccountState,
    DeleteAccount,
    CreateCampaign,
    ListCampaigns,
    GetCampaign,
    UpdateCampaign,
    ActivateCampaign,
    PauseCampaign,
    ListLeads,
    GetLead,
    CreateLead,
    UpdateLead,
    DeleteLead,
    AddLeadsBulk,
    MoveLeads,
    ListLeadLists,
    CreateLeadList,
    UpdateLeadList,
    DeleteLeadList,
    GetLeadListVerificationStats,
    ListEmails,
    GetEmail,
    ReplyToEmail,
    CountUnreadEmails,
    MarkThreadAsRead,
    VerifyEmail,
    GetCampaignAnalytics,
    GetDailyCampaignAnalytics,
    GetWarmupAnalytics,
    ListBackgroundJobs,
    GetBackgroundJob,
    GetServerInfo,
}

impl ToolName {
    /// Every tool, in the order `tools/list` publishes them.
    pub const ALL: [ToolName; 36] = [
        ToolName::ListAccounts,
        ToolName::GetAccount,
        ToolName::CreateAccount,
        ToolName::UpdateAccount,
        ToolName::ManageAccountState,
        ToolName::DeleteAccount,
        ToolName::CreateCampaign,
        ToolName::ListCampaigns,
        ToolName::GetCampaign,
        ToolName::UpdateCampaign,
        ToolName::ActivateCampaign,
        ToolName::PauseCampaign,
        ToolName::ListLeads,
        ToolName::GetLead,
        ToolName::CreateLead,
        ToolName::UpdateLead,
        ToolName::DeleteLead,
        ToolName::AddLeadsBulk,
        ToolName::MoveLeads,
        ToolName::ListLeadLists,
        ToolName::CreateLeadList,
        ToolName::UpdateLeadList,
        ToolName::DeleteLeadList,
        ToolName::GetLeadListVerificationStats,
        ToolName::ListEmails,
        ToolName::GetEmail,
        ToolName::ReplyToEmail,
        ToolName::CountUnreadEmails,
        ToolName::MarkThreadAsRead,
        ToolName::VerifyEmail,
        ToolName::GetCampaignAnalytics,
        ToolName::GetDailyCampaignAnalytics,
        ToolName::GetWarmupAnalytics,
        ToolName::ListBackgroundJobs,
        ToolName::GetBackgroundJob,
        ToolName::GetServerInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ListAccounts => "list_accounts",
            ToolName::GetAccount => "get_account",
            ToolName::CreateAccount => "create_account",
            ToolName::UpdateAccount => "update_account",
            ToolName::ManageAccountState => "manage_account_state",
            ToolName::DeleteAccount => "delete_account",
            ToolName::CreateCampaign => "create_campaign",
            ToolName::ListCampaigns => "list_campaigns",
            ToolName::GetCampaign => "get_campaign",
            ToolName::UpdateCampaign => "update_campaign",
            ToolName::ActivateCampaign => "activate_campaign",
            ToolName::PauseCampaign => "pause_campaign",
            ToolName::ListLeads => "list_leads",
            ToolName::GetLead => "get_lead",
            ToolName::CreateLead => "create_lead",
            ToolName::UpdateLead => "update_lead",
            ToolName::DeleteLead => "delete_lead",
            ToolName::AddLeadsBulk => "add_leads_to_campaign_or_list_bulk",
            ToolName::MoveLeads => "move_leads_to_campaign_or_list",
            ToolName::ListLeadLists => "list_lead_lists",
            ToolName::CreateLeadList => "create_lead_list",
            ToolName::UpdateLeadList => "update_lead_list",
            ToolName::DeleteLeadList => "delete_lead_list",
            ToolName::GetLeadListVerificationStats => "get_verification_stats_for_lead_list",
            ToolName::ListEmails => "list_emails",
            ToolName::GetEmail => "get_email",
            ToolName::ReplyToEmail => "reply_to_email",
            ToolName::CountUnreadEmails => "count_unread_emails",
            ToolName::MarkThreadAsRead => "mark_thread_as_read",
            ToolName::VerifyEmail => "verify_email",
            ToolName::GetCampaignAnalytics => "get_campaign_analytics",
            ToolName::GetDailyCampaignAnalytics => "get_daily_campaign_analytics",
            ToolName::GetWarmupAnalytics => "get_warmup_analytics",
            ToolName::ListBackgroundJobs => "list_background_jobs",
            ToolName::GetBackgroundJob => "get_background_job",
            ToolName::GetServerInfo => "get_server_info",
        }
    }

    /// Category gating this tool. `None` means always loaded.
    pub fn category(&self) -> Option<Category> {
        use ToolName::*;

        match self {
            ListAccounts | GetAccount | CreateAccount | UpdateAccount | ManageAccountState
            | DeleteAccount => Some(Category::Accounts),
            CreateCampaign | ListCampaigns | GetCampaign | UpdateCampaign | ActivateCampaign
            | PauseCampaign => Some(Category::Campaigns),
            ListLeads | GetLead | CreateLead | UpdateLead | DeleteLead | AddLeadsBulk | MoveLeads
            | ListLeadLists | CreateLeadList | UpdateLeadList | DeleteLeadList
            | GetLeadListVerificationStats => Some(Category::Leads),
            ListEmails | GetEmail | ReplyToEmail | CountUnreadEmails | MarkThreadAsRead
            | VerifyEmail => Some(Category::Emails),
            GetCampaignAnalytics | GetDailyCampaignAnalytics | GetWarmupAnalytics => {
                Some(Category::Analytics)
            }
            ListBackgroundJobs | GetBackgroundJob => Some(Category::BackgroundJobs),
            GetServerInfo => None,
        }
    }

    /// Static argument contract and hints.
    pub fn spec(&self) -> &'static ToolSpec {
        use ToolName::*;

        match self {
            ListAccounts => &accounts::LIST_ACCOUNTS,
            GetAccount => &accounts::GET_ACCOUNT,
            CreateAccount => &accounts::CREATE_ACCOUNT,
            UpdateAccount => &accounts::UPDATE_ACCOUNT,
            ManageAccountState => &accounts::MANAGE_ACCOUNT_STATE,
            DeleteAccount => &accounts::DELETE_ACCOUNT,
            CreateCampaign => &campaigns::CREATE_CAMPAIGN,
            ListCampaigns => &campaigns::LIST_CAMPAIGNS,
            GetCampaign => &campaigns::GET_CAMPAIGN,
            UpdateCampaign => &campaigns::UPDATE_CAMPAIGN,
            ActivateCampaign => &campaigns::ACTIVATE_CAMPAIGN,
            PauseCampaign => &campaigns::PAUSE_CAMPAIGN,
            ListLeads => &leads::LIST_LEADS,
            GetLead => &leads::GET_LEAD,
            CreateLead => &leads::CREATE_LEAD,
            UpdateLead => &leads::UPDATE_LEAD,
            DeleteLead => &leads::DELETE_LEAD,
            AddLeadsBulk => &leads::ADD_LEADS_BULK,
            MoveLeads => &leads::MOVE_LEADS,
            ListLeadLists => &lead_lists::LIST_LEAD_LISTS,
            CreateLeadList => &lead_lists::CREATE_LEAD_LIST,
            UpdateLeadList => &lead_lists::UPDATE_LEAD_LIST,
            DeleteLeadList => &lead_lists::DELETE_LEAD_LIST,
            GetLeadListVerificationStats => &lead_lists::GET_VERIFICATION_STATS,
            ListEmails => &emails::LIST_EMAILS,
            GetEmail => &emails::GET_EMAIL,
            ReplyToEmail => &emails::REPLY_TO_EMAIL,
            CountUnreadEmails => &emails::COUNT_UNREAD_EMAILS,
            MarkThreadAsRead => &emails::MARK_THREAD_AS_READ,
            VerifyEmail => &emails::VERIFY_EMAIL,
            GetCampaignAnalytics => &analytics::GET_CAMPAIGN_ANALYTICS,
            GetDailyCampaignAnalytics => &analytics::GET_DAILY_CAMPAIGN_ANALYTICS,
            GetWarmupAnalytics => &analytics::GET_WARMUP_ANALYTICS,
            ListBackgroundJobs => &background_jobs::LIST_BACKGROUND_JOBS,
            GetBackgroundJob => &background_jobs::GET_BACKGROUND_JOB,
            GetServerInfo => &server_info::GET_SERVER_INFO,
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        self.spec().hints.requires_confirmation
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}
